//! 产品数据模型

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 尚未持久化的产品
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: String,
}

/// multipart 中的文本字段，未做类型转换
#[derive(Debug, Clone, Default, Validate)]
pub struct ProductForm {
    pub name: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: Option<String>,
    pub description: Option<String>,
}

/// 通过校验、已完成类型转换的字段
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl ProductForm {
    /// 校验并转换字段类型；价格为空串时存为 null
    pub fn coerce(self) -> Result<ProductFields, CoreError> {
        self.validate()?;

        let price = self.price.as_deref().and_then(parse_number);

        Ok(ProductFields {
            name: self.name,
            price,
            description: self.description,
        })
    }
}

impl ProductFields {
    pub fn into_draft(self, image_url: String) -> ProductDraft {
        ProductDraft {
            name: self.name,
            price: self.price,
            description: self.description,
            image_url,
        }
    }
}

/// 文本转数字：十进制（可带符号、小数、指数）或无符号的 `0x`/`0o`/`0b` 整数。
/// 空串与非有限值返回 `None`。
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let radix_literal = |prefix: [&str; 2], radix: u32| {
        prefix
            .iter()
            .find_map(|p| text.strip_prefix(p))
            .map(|digits| digits.strip_prefix('+').map_or(digits, |_| ""))
            .map(|digits| u64::from_str_radix(digits, radix).ok().map(|n| n as f64))
    };

    let value = radix_literal(["0x", "0X"], 16)
        .or_else(|| radix_literal(["0o", "0O"], 8))
        .or_else(|| radix_literal(["0b", "0B"], 2))
        .unwrap_or_else(|| text.parse::<f64>().ok())?;

    value.is_finite().then_some(value)
}

fn validate_price(price: &str) -> Result<(), ValidationError> {
    if price.trim().is_empty() || parse_number(price).is_some() {
        return Ok(());
    }
    let mut error = ValidationError::new("price");
    error.message = Some(format!("price is not a number: {:?}", price.trim()).into());
    Err(error)
}
