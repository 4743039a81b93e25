//! Offline gateway.
//!
//! [`CannedGateway`] answers advice questions from a small keyword table
//! and extracts invoice actions either from a scripted queue (tests,
//! demos) or with a word-level heuristic. It is what the app runs when no
//! API key is configured.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use udyamx_core::actions::{AddAction, InvoiceActions, RemoveAction, UpdateAction};
use udyamx_core::Money;

use crate::gateway::AiGateway;

const SALES_REPLY: &str = "To increase sales, consider these strategies: 1) Offer promotions or discounts to attract new customers. \
2) Implement a loyalty program to retain existing customers. 3) Use social media marketing to reach a wider audience. \
We can analyze your Firestore data to give more specific advice.";

const BAKERY_REPLY: &str = "For a bakery, top marketing strategies include: 1) High-quality photos on Instagram and Pinterest. \
2) Collaborating with local coffee shops. 3) Offering daily specials and promoting them on a chalkboard sign or social media. \
4) Running a 'Baker's Dozen' loyalty card.";

const DEFAULT_REPLY: &str = "I'm UdyamX Co-Pilot, your digital mentor. Ask me anything about growing your business, \
marketing strategies, or financial planning. For example, 'How can I improve my inventory management?'";

const REMOVE_WORDS: &[&str] = &["remove", "delete", "hatao", "hata", "kaadh", "kadha"];
const UPDATE_WORDS: &[&str] = &["change", "update", "make", "set", "karo", "kar"];
const FILLER_WORDS: &[&str] = &["add", "and", "aur", "ani", "the", "of", "to", "please", "also"];

/// Keyword-driven gateway that never touches the network.
#[derive(Debug, Default)]
pub struct CannedGateway {
    scripted: Mutex<VecDeque<InvoiceActions>>,
    latency: Option<Duration>,
}

impl CannedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every answer, to mimic a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queues an extraction result returned before falling back to the heuristic.
    pub fn push_actions(&self, actions: InvoiceActions) {
        if let Ok(mut queue) = self.scripted.lock() {
            queue.push_back(actions);
        }
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn next_scripted(&self) -> Option<InvoiceActions> {
        self.scripted.lock().ok()?.pop_front()
    }
}

#[async_trait]
impl AiGateway for CannedGateway {
    async fn get_advice(&self, prompt: &str) -> String {
        self.pause().await;
        let lower = prompt.to_lowercase();
        let reply = if lower.contains("increase sales") {
            SALES_REPLY
        } else if lower.contains("bakery") {
            BAKERY_REPLY
        } else {
            DEFAULT_REPLY
        };
        reply.to_string()
    }

    async fn parse_invoice_actions(&self, spoken: &str) -> InvoiceActions {
        self.pause().await;
        if let Some(actions) = self.next_scripted() {
            debug!("Returning scripted invoice actions");
            return actions;
        }
        heuristic_actions(spoken)
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

/// Splits a transcript into clauses and reads each as an add, remove or update.
///
/// Clauses are separated by commas, "and", "aur" or "ani". A clause with a
/// remove word becomes a removal, one with an update word and a number
/// becomes an update, and anything else naming an item becomes an add with
/// quantity 1 unless a number is present.
pub fn heuristic_actions(spoken: &str) -> InvoiceActions {
    let mut add = Vec::new();
    let mut remove = Vec::new();
    let mut update = Vec::new();

    for clause in split_clauses(spoken) {
        let words: Vec<String> = clause
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            continue;
        }

        let quantity = words.iter().find_map(|w| number_word(w));
        let is_remove = words.iter().any(|w| REMOVE_WORDS.contains(&w.as_str()));
        let is_update = !is_remove && quantity.is_some() && words.iter().any(|w| UPDATE_WORDS.contains(&w.as_str()));

        let name_words: Vec<&str> = words
            .iter()
            .map(String::as_str)
            .filter(|w| {
                number_word(w).is_none()
                    && !REMOVE_WORDS.contains(w)
                    && !UPDATE_WORDS.contains(w)
                    && !FILLER_WORDS.contains(w)
            })
            .collect();
        if name_words.is_empty() {
            continue;
        }
        let description = title_case(&name_words);

        if is_remove {
            remove.push(RemoveAction { description });
        } else if is_update {
            update.push(UpdateAction {
                description,
                quantity: quantity.unwrap_or(1),
            });
        } else {
            add.push(AddAction {
                description,
                quantity: quantity.unwrap_or(1).max(1),
                price: Money::zero(),
            });
        }
    }

    InvoiceActions {
        add: (!add.is_empty()).then_some(add),
        remove: (!remove.is_empty()).then_some(remove),
        update: (!update.is_empty()).then_some(update),
    }
}

fn split_clauses(spoken: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    for part in spoken.split([',', ';', '.']) {
        let mut current: Vec<&str> = Vec::new();
        for word in part.split_whitespace() {
            if matches!(word.to_lowercase().as_str(), "and" | "aur" | "ani") {
                if !current.is_empty() {
                    clauses.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.push(word);
            }
        }
        if !current.is_empty() {
            clauses.push(current.join(" "));
        }
    }
    clauses
}

fn number_word(word: &str) -> Option<i64> {
    if let Ok(n) = word.parse::<i64>() {
        return Some(n);
    }
    let n = match word {
        "one" | "ek" => 1,
        "two" | "do" | "don" => 2,
        "three" | "teen" | "tin" => 3,
        "four" | "char" | "chaar" => 4,
        "five" | "paanch" | "pach" => 5,
        "six" | "chhe" | "saha" => 6,
        "seven" | "saat" => 7,
        "eight" | "aath" => 8,
        "nine" | "nau" => 9,
        "ten" | "das" | "daha" => 10,
        _ => return None,
    };
    Some(n)
}

fn title_case(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_advice_keywords() {
        let gateway = CannedGateway::new();
        assert_eq!(gateway.get_advice("How can I INCREASE SALES?").await, SALES_REPLY);
        assert_eq!(gateway.get_advice("I run a bakery").await, BAKERY_REPLY);
        assert_eq!(gateway.get_advice("hello").await, DEFAULT_REPLY);
    }

    #[tokio::test]
    async fn test_scripted_actions_come_first() {
        let gateway = CannedGateway::new();
        gateway.push_actions(InvoiceActions {
            remove: Some(vec![RemoveAction {
                description: "Scripted".to_string(),
            }]),
            ..Default::default()
        });

        let first = gateway.parse_invoice_actions("two soap").await;
        assert_eq!(first.remove.unwrap()[0].description, "Scripted");

        let second = gateway.parse_invoice_actions("two soap").await;
        let add = second.add.unwrap();
        assert_eq!(add[0].description, "Soap");
        assert_eq!(add[0].quantity, 2);
    }

    #[test]
    fn test_heuristic_mixed_clauses() {
        let actions = heuristic_actions("add 3 herbal soap, remove candle and make biscuit 5");

        let add = actions.add.unwrap();
        assert_eq!(add.len(), 1);
        assert_eq!(add[0].description, "Herbal Soap");
        assert_eq!(add[0].quantity, 3);
        assert!(add[0].price.is_zero());

        assert_eq!(actions.remove.unwrap()[0].description, "Candle");

        let update = actions.update.unwrap();
        assert_eq!(update[0].description, "Biscuit");
        assert_eq!(update[0].quantity, 5);
    }

    #[test]
    fn test_heuristic_hindi_words() {
        let actions = heuristic_actions("do maggi aur salt hatao");
        let add = actions.add.unwrap();
        assert_eq!(add[0].description, "Maggi");
        assert_eq!(add[0].quantity, 2);
        assert_eq!(actions.remove.unwrap()[0].description, "Salt");
    }

    #[test]
    fn test_heuristic_empty_input() {
        assert!(heuristic_actions("").is_empty());
        assert!(heuristic_actions("and, aur").is_empty());
    }
}
