use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::{
    config::DEFAULT_CLIENT_MATCH_THRESHOLD,
    domain::logic::number_words::normalize_number_words,
    entities::{Client, ClientId, Product, Shift, SimilarityScorer, VoiceCommand},
    ext::standard_scorers::TokenEditDistance,
};

static PAYMENT_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(pago|abono|cuenta|acuenta)\s*(de)?\s*(\d+(\.\d{1,2})?)")
        .expect("payment keyword pattern is a fixed literal")
});

static PAYMENT_CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(\.\d{1,2})?)\s*(soles|so|lucas)")
        .expect("payment currency pattern is a fixed literal")
});

/// Best-effort extraction of an intake entry from one transcribed
/// utterance. The result only pre-fills the form; the operator confirms it.
///
/// Pipeline:
/// 1. lower-case and turn number words into digits,
/// 2. fuzzy-match the utterance against every client's name and route
///    number, keeping the best score within the threshold (earliest client
///    in roster order on ties),
/// 3. look for "<qty> [de] <product>" or "<product> [de] <qty>" per product,
/// 4. look for a payment ("pago 20", "abono de 15.50", "20 soles"),
/// 5. look for the shift ("tarde"/"noche", "mañana"/"día").
pub struct VoiceCommandParser<S: SimilarityScorer = TokenEditDistance> {
    scorer: S,
    threshold: f64,
}

impl VoiceCommandParser<TokenEditDistance> {
    pub fn new() -> Self {
        Self::with_scorer(TokenEditDistance, DEFAULT_CLIENT_MATCH_THRESHOLD)
    }
}

impl Default for VoiceCommandParser<TokenEditDistance> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SimilarityScorer> VoiceCommandParser<S> {
    pub fn with_scorer(scorer: S, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn parse(&self, transcript: &str, clients: &[Client], products: &[Product]) -> VoiceCommand {
        let text = normalize_number_words(&transcript.to_lowercase());

        let command = VoiceCommand {
            client_id: self.detect_client(&text, clients),
            products: detect_products(&text, products),
            payment_amount: detect_payment(&text),
            shift: detect_shift(&text),
        };
        debug!(transcript = %text, ?command, "parsed voice command");
        command
    }

    fn detect_client(&self, text: &str, clients: &[Client]) -> Option<ClientId> {
        clients
            .iter()
            .map(|c| (self.client_score(c, text), c))
            .filter(|(score, _)| *score <= self.threshold)
            .fold(None, |best: Option<(f64, &Client)>, (score, client)| match best {
                Some((best_score, _)) if best_score <= score => best,
                _ => Some((score, client)),
            })
            .map(|(_, client)| client.id.clone())
    }

    /// Best score over the client's searchable keys.
    fn client_score(&self, client: &Client, text: &str) -> f64 {
        let by_name = self.scorer.score(&client.name, text);
        client
            .order_index
            .map(|i| self.scorer.score(&i.to_string(), text))
            .map_or(by_name, |by_index| by_index.min(by_name))
    }
}

fn detect_products(text: &str, products: &[Product]) -> BTreeMap<String, u32> {
    products
        .iter()
        .filter_map(|p| match detect_quantity(text, &p.name) {
            Ok(quantity) => quantity.map(|q| (p.name.clone(), q)),
            Err(e) => {
                warn!(product = %p.name, error = %e, "skipping product in voice command");
                None
            }
        })
        .collect()
}

fn detect_quantity(
    text: &str,
    product_name: &str,
) -> Result<Option<u32>, Box<dyn std::error::Error + Send + Sync>> {
    // Tolerate plural sound-alikes: "panes", "kekes", "bizcochos".
    let name = product_name.trim().to_lowercase();
    let singular = name.strip_suffix('s').unwrap_or(&name);
    if singular.is_empty() {
        return Ok(None);
    }
    let stem = regex::escape(singular);

    let quantity_first = Regex::new(&format!(r"(?i)(\d+)\s*(?:de\s*)?{stem}(?:es|s)?\b"))?;
    let product_first = Regex::new(&format!(r"(?i){stem}(?:es|s)?\s*(?:de\s*)?(\d+)\b"))?;

    let digits = quantity_first
        .captures(text)
        .or_else(|| product_first.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    Ok(match digits {
        Some(d) => Some(d.parse::<u32>()?),
        None => None,
    })
}

fn detect_payment(text: &str) -> Option<f64> {
    PAYMENT_KEYWORD_RE
        .captures(text)
        .and_then(|caps| caps.get(3))
        .or_else(|| {
            PAYMENT_CURRENCY_RE
                .captures(text)
                .and_then(|caps| caps.get(1))
        })
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn detect_shift(text: &str) -> Option<Shift> {
    if text.contains("tarde") || text.contains("noche") {
        Some(Shift::Afternoon)
    } else if text.contains("mañana") || text.contains("dia") || text.contains("día") {
        Some(Shift::Morning)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProductId;

    fn client(id: &str, name: &str, order_index: i64) -> Client {
        Client {
            id: ClientId(id.into()),
            name: name.into(),
            route: None,
            order_index: Some(order_index),
            phone: None,
            initial_balance: 0.0,
            owner_id: None,
            created_at: None,
        }
    }

    fn product(name: &str, price: f64) -> Product {
        Product {
            id: ProductId(name.to_lowercase()),
            name: name.into(),
            price,
        }
    }

    fn roster() -> Vec<Client> {
        vec![
            client("c3", "Doña Rosa", 3),
            client("c7", "Bodega Martinez", 7),
            client("c12", "Juan Quispe", 12),
        ]
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Pan", 0.2),
            product("Bizcochos", 0.5),
            product("Keke", 12.0),
        ]
    }

    #[test]
    fn full_utterance() {
        let parser = VoiceCommandParser::new();
        let command = parser.parse(
            "cliente 3 cinco panes pago 20 soles tarde",
            &roster(),
            &catalog(),
        );

        assert_eq!(command.client_id, Some(ClientId("c3".into())));
        assert_eq!(command.products.len(), 1);
        assert_eq!(command.products.get("Pan"), Some(&5));
        assert_eq!(command.payment_amount, Some(20.0));
        assert_eq!(command.shift, Some(Shift::Afternoon));
    }

    #[test]
    fn client_by_name_with_misspelling() {
        let parser = VoiceCommandParser::new();
        let command = parser.parse("bodega martines dos kekes", &roster(), &catalog());
        assert_eq!(command.client_id, Some(ClientId("c7".into())));
        assert_eq!(command.products.get("Keke"), Some(&2));
    }

    #[test]
    fn ties_keep_roster_order() {
        let parser = VoiceCommandParser::new();
        let twins = vec![client("first", "Rosa", 20), client("second", "Rosa", 21)];
        let command = parser.parse("rosa", &twins, &[]);
        assert_eq!(command.client_id, Some(ClientId("first".into())));
    }

    #[test]
    fn product_then_quantity_and_de() {
        let parser = VoiceCommandParser::new();
        let command = parser.parse("bizcochos 10 y 4 de pan", &[], &catalog());
        assert_eq!(command.products.get("Bizcochos"), Some(&10));
        assert_eq!(command.products.get("Pan"), Some(&4));
    }

    #[test]
    fn payment_keyword_has_priority_over_currency_suffix() {
        assert_eq!(detect_payment("abono de 15.50 y 30 soles"), Some(15.5));
        assert_eq!(detect_payment("deja 12 lucas"), Some(12.0));
        assert_eq!(detect_payment("sin pago"), None);
    }

    #[test]
    fn shift_keywords() {
        assert_eq!(detect_shift("en la noche"), Some(Shift::Afternoon));
        assert_eq!(detect_shift("buen día"), Some(Shift::Morning));
        assert_eq!(detect_shift("por la mañana"), Some(Shift::Morning));
        assert_eq!(detect_shift("nada"), None);
    }

    #[test]
    fn irrelevant_text_yields_empty_command() {
        let parser = VoiceCommandParser::new();
        let command = parser.parse("hola que tal", &roster(), &catalog());
        assert!(command.is_empty(), "{command:?}");
    }

    #[test]
    fn unparsable_quantity_only_skips_that_product() {
        let parser = VoiceCommandParser::new();
        let command = parser.parse("99999999999999 panes 3 kekes", &[], &catalog());
        assert_eq!(command.products.get("Pan"), None);
        assert_eq!(command.products.get("Keke"), Some(&3));
    }

    #[test]
    fn product_names_with_regex_metacharacters_are_literal() {
        let parser = VoiceCommandParser::new();
        let odd = vec![product("Pan+Queso", 1.0)];
        let command = parser.parse("2 pan+queso y 5 paaaqueso", &[], &odd);
        assert_eq!(command.products.get("Pan+Queso"), Some(&2));
    }

    #[test]
    fn parsing_is_deterministic() {
        let parser = VoiceCommandParser::new();
        let text = "juan quispe 3 kekes abono 7 mañana";
        let first = parser.parse(text, &roster(), &catalog());
        for _ in 0..10 {
            assert_eq!(parser.parse(text, &roster(), &catalog()), first);
        }
    }
}
