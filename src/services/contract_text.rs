use chrono::NaiveDate;

use crate::finance::{Cents, format_brl};

/// Used when no `dj_service` template has been stored yet.
pub const DEFAULT_TEMPLATE: &str = "\
CONTRATO DE PRESTAÇÃO DE SERVIÇOS ARTÍSTICOS

CONTRATANTE: {{producerName}}
CONTRATADO: {{djName}}

1. OBJETO
O CONTRATADO se apresentará no evento \"{{eventName}}\", no dia {{eventDate}},
em {{location}}, {{city}}.

2. REMUNERAÇÃO
Pela apresentação o CONTRATANTE pagará o cachê de {{cacheValue}}.
A agência retém comissão de {{commissionRate}}% sobre o valor do cachê.

3. DISPOSIÇÕES GERAIS
O presente contrato passa a valer a partir da assinatura eletrônica do CONTRATADO.

Emitido em {{today}}.
";

/// Values substituted into a contract template.
#[derive(Debug, Clone)]
pub struct ContractContext<'a> {
    pub event_name: &'a str,
    pub event_date: NaiveDate,
    pub location: Option<&'a str>,
    pub city: Option<&'a str>,
    pub cache_value: Cents,
    pub dj_name: &'a str,
    pub producer_name: &'a str,
    pub commission_rate: f64,
    pub today: NaiveDate,
}

fn br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `20` rather than `20.0`; fractional rates keep their decimals.
fn rate_label(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{rate:.0}")
    } else {
        rate.to_string()
    }
}

/// Fill every `{{placeholder}}` occurrence. Unknown placeholders are left as is.
pub fn render(template: &str, ctx: &ContractContext<'_>) -> String {
    let substitutions = [
        ("{{eventName}}", ctx.event_name.to_string()),
        ("{{eventDate}}", br_date(ctx.event_date)),
        ("{{location}}", ctx.location.unwrap_or_default().to_string()),
        ("{{city}}", ctx.city.unwrap_or_default().to_string()),
        ("{{cacheValue}}", format_brl(ctx.cache_value)),
        ("{{djName}}", ctx.dj_name.to_string()),
        ("{{producerName}}", ctx.producer_name.to_string()),
        ("{{commissionRate}}", rate_label(ctx.commission_rate)),
        ("{{today}}", br_date(ctx.today)),
    ];

    substitutions
        .iter()
        .fold(template.to_string(), |content, (key, value)| {
            content.replace(key, value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ContractContext<'static> {
        ContractContext {
            event_name: "Sunset Sessions",
            event_date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
            location: Some("Praia do Forte"),
            city: None,
            cache_value: Cents::new(123_456),
            dj_name: "DJ Aurora",
            producer_name: "Maré Produções",
            commission_rate: 20.0,
            today: NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
        }
    }

    #[test]
    fn fills_every_placeholder() {
        let rendered = render(DEFAULT_TEMPLATE, &context());
        assert!(!rendered.contains("{{"), "unfilled placeholder in:\n{rendered}");
        assert!(rendered.contains("\"Sunset Sessions\", no dia 07/03/2026"));
        assert!(rendered.contains("R$ 1.234,56"));
        assert!(rendered.contains("comissão de 20%"));
        assert!(rendered.contains("Emitido em 02/01/2026."));
    }

    #[test]
    fn repeated_and_missing_values() {
        let rendered = render("{{djName}} / {{djName}} / [{{city}}]", &context());
        assert_eq!(rendered, "DJ Aurora / DJ Aurora / []");
    }

    #[test]
    fn fractional_rate_keeps_decimals() {
        let ctx = ContractContext {
            commission_rate: 12.5,
            ..context()
        };
        assert_eq!(render("{{commissionRate}}", &ctx), "12.5");
    }

    #[test]
    fn unknown_placeholders_survive() {
        assert_eq!(render("{{cnpj}}", &context()), "{{cnpj}}");
    }
}
