//! Canonical textual form of spider diagrams
//!
//! ```text
//! NullSD {}
//! PrimarySD {spiders = ["s"], habitats = [("s", [(["A"], [])])], sh_zones = []}
//! UnarySD {operator = "op ¬", arg1 = NullSD {}}
//! BinarySD {operator = "op &", arg1 = NullSD {}, arg2 = NullSD {}}
//! ```
//!
//! Sets are printed in their sorted order, so two diagrams are structurally
//! equal iff their printed forms are identical. Serde goes through the same
//! text so exported proofs stay readable.

use super::diagram::{CompoundDiagram, ConstructionError, Operator, PrimaryDiagram, SpiderDiagram};
use super::zones::{write_string_list, write_zone_list, Region, Zone};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, value},
    multi::separated_list0,
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading a diagram from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("syntax error at offset {offset}: {expected}")]
    Syntax { offset: usize, expected: String },

    #[error("unknown operator {0:?}")]
    UnknownOperator(String),

    #[error("invalid diagram: {0}")]
    Construction(#[from] ConstructionError),
}

/// Result type for reading diagrams
pub type ReadResult<T> = Result<T, ReadError>;

impl fmt::Display for PrimaryDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrimarySD {spiders = ")?;
        write_string_list(f, self.spiders().iter())?;
        f.write_str(", habitats = [")?;
        for (i, (spider, region)) in self.habitats().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "(\"{}\", ", spider)?;
            write_zone_list(f, region.iter())?;
            f.write_str(")")?;
        }
        f.write_str("], sh_zones = ")?;
        write_zone_list(f, self.shaded_zones().iter())?;
        f.write_str("}")
    }
}

impl fmt::Display for CompoundDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands = self.operands();
        if self.operator() == Operator::Negation {
            write!(f, "UnarySD {{operator = \"{}\", arg1 = {}}}", self.operator(), operands[0])
        } else {
            write!(
                f,
                "BinarySD {{operator = \"{}\", arg1 = {}, arg2 = {}}}",
                self.operator(),
                operands[0],
                operands[1]
            )
        }
    }
}

impl fmt::Display for SpiderDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiderDiagram::Null => f.write_str("NullSD {}"),
            SpiderDiagram::Primary(primary) => primary.fmt(f),
            SpiderDiagram::Compound(compound) => compound.fmt(f),
        }
    }
}

impl FromStr for SpiderDiagram {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        read_diagram(s)
    }
}

impl Serialize for SpiderDiagram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpiderDiagram {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        read_diagram(&text).map_err(de::Error::custom)
    }
}

/// Diagram as read, before validation
#[derive(Debug, Clone)]
enum RawDiagram {
    Null,
    Primary {
        spiders: Vec<String>,
        habitats: Vec<(String, Vec<Zone>)>,
        shaded: Vec<Zone>,
    },
    Compound {
        operator: String,
        operands: Vec<RawDiagram>,
    },
}

impl RawDiagram {
    fn build(self) -> ReadResult<SpiderDiagram> {
        match self {
            RawDiagram::Null => Ok(SpiderDiagram::Null),
            RawDiagram::Primary {
                spiders,
                habitats,
                shaded,
            } => {
                let habitats = habitats
                    .into_iter()
                    .map(|(spider, zones)| (spider, zones.into_iter().collect::<Region>()));
                Ok(SpiderDiagram::primary(spiders, habitats, shaded)?)
            }
            RawDiagram::Compound { operator, operands } => {
                let op =
                    Operator::from_name(&operator).ok_or(ReadError::UnknownOperator(operator))?;
                let operands = operands
                    .into_iter()
                    .map(RawDiagram::build)
                    .collect::<ReadResult<Vec<_>>>()?;
                Ok(SpiderDiagram::compound(op, operands)?)
            }
        }
    }
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn quoted(input: &str) -> IResult<&str, String> {
    map(
        ws(delimited(char('"'), take_while(|c| c != '"'), char('"'))),
        str::to_string,
    )(input)
}

fn list<'a, O, F>(item: F) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<O>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(
        ws(char('[')),
        separated_list0(ws(char(',')), item),
        ws(char(']')),
    )
}

/// `name = value`
fn field<'a, O, F>(name: &'static str, item: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    preceded(tuple((ws(tag(name)), ws(char('=')))), item)
}

fn comma(input: &str) -> IResult<&str, char> {
    ws(char(','))(input)
}

fn string_list(input: &str) -> IResult<&str, Vec<String>> {
    list(quoted)(input)
}

fn zone(input: &str) -> IResult<&str, Zone> {
    map(
        delimited(
            ws(char('(')),
            separated_pair(string_list, comma, string_list),
            ws(char(')')),
        ),
        |(in_contours, out_contours)| Zone::new(in_contours, out_contours),
    )(input)
}

fn zone_list(input: &str) -> IResult<&str, Vec<Zone>> {
    list(zone)(input)
}

fn habitat(input: &str) -> IResult<&str, (String, Vec<Zone>)> {
    delimited(
        ws(char('(')),
        separated_pair(quoted, comma, zone_list),
        ws(char(')')),
    )(input)
}

fn null_sd(input: &str) -> IResult<&str, RawDiagram> {
    value(
        RawDiagram::Null,
        tuple((ws(tag("NullSD")), ws(char('{')), ws(char('}')))),
    )(input)
}

fn primary_sd(input: &str) -> IResult<&str, RawDiagram> {
    map(
        preceded(
            ws(tag("PrimarySD")),
            delimited(
                ws(char('{')),
                tuple((
                    field("spiders", string_list),
                    preceded(comma, field("habitats", list(habitat))),
                    preceded(comma, field("sh_zones", zone_list)),
                )),
                ws(char('}')),
            ),
        ),
        |(spiders, habitats, shaded)| RawDiagram::Primary {
            spiders,
            habitats,
            shaded,
        },
    )(input)
}

fn unary_sd(input: &str) -> IResult<&str, RawDiagram> {
    map(
        preceded(
            ws(tag("UnarySD")),
            delimited(
                ws(char('{')),
                tuple((
                    field("operator", quoted),
                    preceded(comma, field("arg1", diagram)),
                )),
                ws(char('}')),
            ),
        ),
        |(operator, operand)| RawDiagram::Compound {
            operator,
            operands: vec![operand],
        },
    )(input)
}

fn binary_sd(input: &str) -> IResult<&str, RawDiagram> {
    map(
        preceded(
            ws(tag("BinarySD")),
            delimited(
                ws(char('{')),
                tuple((
                    field("operator", quoted),
                    preceded(comma, field("arg1", diagram)),
                    preceded(comma, field("arg2", diagram)),
                )),
                ws(char('}')),
            ),
        ),
        |(operator, left, right)| RawDiagram::Compound {
            operator,
            operands: vec![left, right],
        },
    )(input)
}

fn diagram(input: &str) -> IResult<&str, RawDiagram> {
    alt((null_sd, primary_sd, unary_sd, binary_sd))(input)
}

/// Read a diagram from its textual form
pub fn read_diagram(input: &str) -> ReadResult<SpiderDiagram> {
    let raw = match all_consuming(ws(diagram))(input) {
        Ok((_, raw)) => raw,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(ReadError::Syntax {
                offset: input.len() - e.input.len(),
                expected: e.code.description().to_string(),
            })
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(ReadError::Syntax {
                offset: input.len(),
                expected: "more input".to_string(),
            })
        }
    };
    raw.build()
}
