use std::collections::BTreeMap;

use super::{client::ClientId, transaction::Shift};

/// Fields recognized in a single utterance. Anything not recognized is left
/// unset, so applying the command never clears what the operator already
/// entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceCommand {
    pub client_id: Option<ClientId>,
    pub products: BTreeMap<String, u32>,
    pub payment_amount: Option<f64>,
    pub shift: Option<Shift>,
}

impl VoiceCommand {
    pub fn is_empty(&self) -> bool {
        self.client_id.is_none()
            && self.products.is_empty()
            && self.payment_amount.is_none()
            && self.shift.is_none()
    }
}
