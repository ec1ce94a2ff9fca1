//! # term
//!
//! why: mongod logs term -1 before the first election, RaftMongo.tla starts at term 0
//! relations: used by translate.rs for current terms and commit point terms
//! what: sentinel constants and normalize_term

/// Term a node reports before any election has happened.
pub const PRE_ELECTION_TERM: i64 = -1;

/// Term of the TLA+ spec's initial state.
pub const INITIAL_TERM: i64 = 0;

/// Map the pre-election sentinel to the initial term, leave every other term alone.
pub fn normalize_term(term: i64) -> i64 {
    if term == PRE_ELECTION_TERM {
        INITIAL_TERM
    } else {
        term
    }
}
