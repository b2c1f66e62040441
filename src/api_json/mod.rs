//! Forma de las peticiones y respuestas JSON de la API de estadísticas.

pub mod handlers;

use actix_web::HttpResponse;
use serde_json::json;
use std::collections::HashMap;

use crate::error::StatsError;
use crate::pipeline::ExportParams;

/// Lee `month`, `year` y `city` de la query. Mes o año ausentes, no numéricos
/// o cero se rechazan antes de consultar nada.
pub fn parse_export_query(query: &HashMap<String, String>) -> Result<ExportParams, StatsError> {
    let month = query
        .get("month")
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|m| *m != 0)
        .ok_or(StatsError::MissingPeriod)?;
    let year = query
        .get("year")
        .and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|y| *y != 0)
        .ok_or(StatsError::MissingPeriod)?;
    let city = query
        .get("city")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(ExportParams { month, year, city })
}

/// Convierte un error en la respuesta HTTP correspondiente. Los resultados
/// vacíos usan la clave `message`; los errores, `error`.
pub fn error_response(err: &StatsError) -> HttpResponse {
    let status = err.status_code();
    if err.is_no_data() {
        return HttpResponse::build(status).json(json!({"message": err.to_string()}));
    }
    if err.is_input_rejection() || matches!(err, StatsError::NotFound(_)) {
        return HttpResponse::build(status).json(json!({"error": err.to_string()}));
    }
    log::error!("request failed: {}", err);
    HttpResponse::build(status).json(json!({"error": format!("حدث خطأ: {}", err)}))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn export_query_requires_month_and_year() {
        assert!(matches!(parse_export_query(&q(&[("year", "2024")])), Err(StatsError::MissingPeriod)));
        assert!(matches!(
            parse_export_query(&q(&[("month", "x"), ("year", "2024")])),
            Err(StatsError::MissingPeriod)
        ));
        assert!(matches!(
            parse_export_query(&q(&[("month", "0"), ("year", "2024")])),
            Err(StatsError::MissingPeriod)
        ));
        let p = parse_export_query(&q(&[("month", "5"), ("year", "2024"), ("city", "")])).unwrap();
        assert_eq!(p, ExportParams { month: 5, year: 2024, city: None });
    }
}
