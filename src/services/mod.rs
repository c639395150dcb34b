pub mod contract_text;
pub mod events;
pub mod payments;
