//! Wallet handlers
//!
//! TOKEN / TICKET balances, ledger history and token-to-ticket exchange.

use axum::{extract::State, Json};
use hub_core::{Currency, Page};
use hub_service::dto::{BalanceResponse, ExchangeRequest, ExchangeResponse, LedgerEntryResponse};
use hub_service::WalletService;
use serde::Deserialize;

use crate::extractors::{ApiQuery, AuthUser, Pagination, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub currency: Option<String>,
}

impl HistoryParams {
    /// Case-insensitive currency filter; blank means both
    pub fn currency(&self) -> Result<Option<Currency>, ApiError> {
        self.currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| {
                Currency::parse(c)
                    .ok_or_else(|| ApiError::invalid_query(format!("Unknown currency: {c}")))
            })
            .transpose()
    }
}

/// GET /wallet
pub async fn get_balances(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<BalanceResponse>> {
    let balances = WalletService::new(state.service_context())
        .balances(auth.member_id)
        .await?;
    Ok(Json(balances))
}

/// GET /wallet/transactions?currency=&page=&size=
pub async fn get_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<HistoryParams>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Page<LedgerEntryResponse>>> {
    let history = WalletService::new(state.service_context())
        .history(auth.member_id, params.currency()?, page)
        .await?;
    Ok(Json(history))
}

/// POST /wallet/exchange
pub async fn exchange(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ExchangeRequest>,
) -> ApiResult<Json<ExchangeResponse>> {
    let response = WalletService::new(state.service_context())
        .exchange(auth.member_id, request)
        .await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(currency: Option<&str>) -> HistoryParams {
        HistoryParams {
            currency: currency.map(str::to_string),
        }
    }

    #[test]
    fn test_currency_filter() {
        assert_eq!(params(None).currency().unwrap(), None);
        assert_eq!(params(Some("")).currency().unwrap(), None);
        assert_eq!(params(Some("ticket")).currency().unwrap(), Some(Currency::Ticket));
        assert!(params(Some("gold")).currency().is_err());
    }
}
