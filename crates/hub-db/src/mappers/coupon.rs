//! Coupon model -> entity

use hub_core::entities::{Coupon, Currency};
use hub_core::error::DomainError;
use hub_core::value_objects::Id;

use super::parse_column;
use crate::models::CouponModel;

impl TryFrom<CouponModel> for Coupon {
    type Error = DomainError;

    fn try_from(model: CouponModel) -> Result<Self, Self::Error> {
        Ok(Coupon {
            id: Id::new(model.id),
            code: model.code,
            currency: parse_column("currency", &model.currency, Currency::parse)?,
            amount: model.amount,
            expires_at: model.expires_at,
            member_id: model.member_id.map(Id::new),
            used_at: model.used_at,
            created_at: model.created_at,
        })
    }
}
