//! Line tokenizer / classifier for the constrained Turtle subset.
//!
//! Each buffer line (already trimmed) is classified into exactly one shape;
//! anything that fits none of them is [`Line::Other`] and is skipped by every
//! consumer. Classification works on the *cleaned* form of the line, with the
//! trailing separator run (`;`, `.`, `,`, `]`) stripped, while block-close
//! detection looks at the raw line.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::multispace1,
    sequence::terminated,
    IResult,
};

/// One classified buffer line. Borrowed slices point into the cleaned line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// `@prefix` namespace declaration; ignored by all consumers.
    Prefix,
    /// Opens an anonymous block, optionally with an inline type token.
    BlankOpen { type_token: Option<&'a str> },
    /// Explicit `]` block close.
    BlockClose,
    /// `subject (a|rdf:type) type` declaration.
    SubjectType {
        subject: &'a str,
        type_token: &'a str,
    },
    /// `predicate value` statement; only meaningful inside a subject block.
    Statement { predicate: &'a str, value: &'a str },
    /// Unrecognized; skipped without error.
    Other,
}

/// Strip the trailing separator run the way the original grammar did: one
/// contiguous run of `; . , ]` at the very end, then trailing whitespace.
pub fn strip_trailing_separators(line: &str) -> &str {
    line.trim_end_matches([';', '.', ',', ']']).trim_end()
}

/// True when this raw line closes the current subject block: an explicit
/// closing marker, or the statement terminator ending the block.
pub fn closes_block(raw: &str) -> bool {
    raw.starts_with(']') || raw.ends_with("] .") || raw.ends_with('.')
}

fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// `a` or `rdf:type`, required to be a whole token (enforced by the
/// following `multispace1` in the callers).
fn type_keyword(input: &str) -> IResult<&str, &str> {
    alt((tag("rdf:type"), tag("a")))(input)
}

/// `subject (a|rdf:type) type`; trailing content (e.g. an inline label
/// statement) is ignored, matching the original prefix-only match.
fn subject_type(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, subject) = terminated(token, multispace1)(input)?;
    let (input, _) = terminated(type_keyword, multispace1)(input)?;
    let (input, ty) = token(input)?;
    Ok((input, (subject, ty)))
}

/// `predicate value` where the value is the rest of the cleaned line.
fn statement(input: &str) -> IResult<&str, (&str, &str)> {
    let (rest, predicate) = terminated(token, multispace1)(input)?;
    if rest.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            rest,
            nom::error::ErrorKind::NonEmpty,
        )));
    }
    Ok(("", (predicate, rest)))
}

/// Inline type token on an anonymous-block opener: scan the cleaned line's
/// tokens for a type keyword followed by a type token.
fn inline_type(cleaned: &str) -> Option<&str> {
    let mut tokens = cleaned.split_whitespace().peekable();
    while let Some(tok) = tokens.next() {
        if tok == "a" || tok == "rdf:type" {
            if let Some(&ty) = tokens.peek() {
                return Some(ty);
            }
        }
    }
    None
}

/// Classify one buffer line. `raw` is the trimmed original line, `cleaned`
/// its [`strip_trailing_separators`] form.
pub fn classify<'a>(raw: &'a str, cleaned: &'a str) -> Line<'a> {
    if raw.starts_with("@prefix") {
        return Line::Prefix;
    }
    if raw.starts_with('[') {
        return Line::BlankOpen {
            type_token: inline_type(cleaned),
        };
    }
    if raw.starts_with(']') {
        return Line::BlockClose;
    }
    if let Ok((_, (subject, type_token))) = subject_type(cleaned) {
        return Line::SubjectType {
            subject,
            type_token,
        };
    }
    if let Ok((_, (predicate, value))) = statement(cleaned) {
        return Line::Statement { predicate, value };
    }
    Line::Other
}

/// Classify after trimming and cleaning in one step.
pub fn classify_raw(raw: &str) -> Line<'_> {
    let raw = raw.trim();
    classify(raw, strip_trailing_separators(raw))
}
