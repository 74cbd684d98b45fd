//! # Wire Contract
//!
//! Types and parsing shared by the aggregator, the client core, and the
//! tester, so every side agrees on the exact shape of
//! `POST /api/fetch-car-details`.
//!
//! The one rule of this contract: a missing fact is a value, not an error.
//! Every field of [`CarFacts`] carries an empty default and the response
//! always contains every declared field, with `null` scalars and `[]` lists
//! standing in for whatever no provider could supply.

pub mod facts;
pub mod parse;

pub use facts::{
    CarFacts, ErrorBody, FetchCarDetailsRequest, TireInfo, VideoRef, FETCH_CAR_DETAILS_PATH,
    MISSING_CAR_MODEL_CODE,
};
pub use parse::{facts_from_text, facts_from_value, is_http_url, strip_code_fence, ParseError};
