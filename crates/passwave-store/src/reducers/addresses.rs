use crate::actions::{Action, ActionKind};
use crate::model::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// address id -> address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressesState(pub BTreeMap<String, Address>);

pub fn reduce(state: AddressesState, action: &Action) -> AddressesState {
    match &action.kind {
        ActionKind::AddressesSynced { addresses } => AddressesState(
            addresses
                .iter()
                .map(|address| (address.id.clone(), address.clone()))
                .collect(),
        ),
        _ => state,
    }
}
