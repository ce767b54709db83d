//! Sequence positions as seen by the scorer.
//!
//! Raw encoding used when a sequence is handed to a model:
//!
//! | Token          | Raw value |
//! |----------------|-----------|
//! | `Pad`          | `0`       |
//! | `Mask`         | `-1`      |
//! | `Link(id)`     | `id`      |

use std::fmt;

use crate::LinkId;

/// One position of a model input sequence.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    /// Padding after the end of the sequence (also the start-of-sequence value).
    Pad,
    /// A hidden position the model must reconstruct.
    Mask,
    /// An observed (or resolved) link.
    Link(LinkId),
}

impl Token {
    pub const PAD_RAW: i64 = 0;
    pub const MASK_RAW: i64 = -1;

    #[inline]
    pub fn raw(self) -> i64 {
        match self {
            Token::Pad => Self::PAD_RAW,
            Token::Mask => Self::MASK_RAW,
            Token::Link(id) => id.0 as i64,
        }
    }

    /// Inverse of [`raw`](Self::raw).  Returns `None` for values outside the
    /// encoding (other negatives, or ids that overflow `u32`).
    pub fn from_raw(raw: i64) -> Option<Token> {
        match raw {
            Self::PAD_RAW => Some(Token::Pad),
            Self::MASK_RAW => Some(Token::Mask),
            n if n > 0 => u32::try_from(n).ok().map(|v| Token::Link(LinkId(v))),
            _ => None,
        }
    }

    #[inline]
    pub fn link(self) -> Option<LinkId> {
        match self {
            Token::Link(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn is_mask(self) -> bool {
        matches!(self, Token::Mask)
    }
}

impl From<LinkId> for Token {
    fn from(id: LinkId) -> Self {
        Token::Link(id)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Pad => f.write_str("<pad>"),
            Token::Mask => f.write_str("<mask>"),
            Token::Link(id) => write!(f, "{}", id.0),
        }
    }
}
