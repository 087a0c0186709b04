//! Currency conversion.

use actix_web::{HttpResponse, web};

use tripgenius_shared::dto::CurrencyQuery;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/currency/convert?from=&to=&amount=
///
/// Only input validation can fail; rate lookups fall back to built-in rates.
pub async fn convert(
    state: web::Data<AppState>,
    query: web::Query<CurrencyQuery>,
) -> AppResult<HttpResponse> {
    let CurrencyQuery { from, to, amount } = query.into_inner();
    let conversion = state.currency.convert(&from, &to, amount).await?;
    Ok(HttpResponse::Ok().json(conversion))
}
