// Two security tiers: public (token acquisition) and protected (JWT required).

pub mod protected;
pub mod public;
