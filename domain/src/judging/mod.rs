//! Judge reply handling
//!
//! Judges answer the ranking prompt with JSON naming responses by letter.
//! This module parses those replies and maps the letters back onto response
//! ids, tolerating the usual LLM formatting quirks (code fences, "Response A"
//! versus bare "A", junk entries).

pub mod parsing;

pub use parsing::{RankingReply, find_response_ids, parse_ranking_reply, rank_letter_to_index};
