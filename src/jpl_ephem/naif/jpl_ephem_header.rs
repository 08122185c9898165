//! Text header that JPL embeds in the comment area of DE kernels.
//!
//! Only three pieces are extracted, enough to describe the kernel in the logs:
//!
//! ```text
//! JPL planetary and lunar ephemeris DE440
//! Integrated 25 June 2020
//! ...
//! Time span covered by ephemeris:
//!
//! 31-DEC-1549 00:00 to   25-JAN-2650 00:00
//! JD   2287184.5   to   JD   2688976.5
//! ```
//!
//! Kernels without this comment block are read all the same; the header is then absent.

use std::fmt;

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{line_ending, multispace0, not_line_ending, space1},
    number::complete::double,
    IResult, Parser,
};

#[derive(Debug, PartialEq, Clone)]
pub struct JPLEphemHeader {
    pub version: String,
    pub creation_date: String,
    pub start_ephem: String,
    pub end_ephem: String,
    pub start_jd: f64,
    pub end_jd: f64,
}

/// Skip to `marker` and return the rest of its line, trimmed.
fn line_after<'a>(marker: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input| {
        let (input, _) = take_until(marker)(input)?;
        let (input, _) = tag(marker)(input)?;
        let (input, value) = not_line_ending(input)?;
        Ok((input, value.trim()))
    }
}

fn date_range(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, _) = take_until("Time span covered by ephemeris:")(input)?;
    let (input, _) = tag("Time span covered by ephemeris:")(input)?;
    let (input, _) = multispace0(input)?;
    let (input, (start, _, end)) = (take_until(" to "), tag(" to "), not_line_ending).parse(input)?;
    Ok((input, (start.trim(), end.trim())))
}

fn jd_range(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, (_, _, _, start_jd, _, _, _, _, _, end_jd)) = (
        line_ending,
        tag("JD"),
        space1,
        |s| double(s),
        space1,
        tag("to"),
        space1,
        tag("JD"),
        space1,
        |s| double(s),
    )
        .parse(input)?;
    Ok((input, (start_jd, end_jd)))
}

impl JPLEphemHeader {
    pub fn parse(input: &str) -> IResult<&str, Self> {
        let (input, version) = line_after("JPL planetary and lunar ephemeris ")(input)?;
        let (input, creation_date) = line_after("Integrated ")(input)?;
        let (input, (start_ephem, end_ephem)) = date_range(input)?;
        let (input, (start_jd, end_jd)) = jd_range(input)?;
        Ok((
            input,
            JPLEphemHeader {
                version: version.to_string(),
                creation_date: creation_date.to_string(),
                start_ephem: start_ephem.to_string(),
                end_ephem: end_ephem.to_string(),
                start_jd,
                end_jd,
            },
        ))
    }
}

impl fmt::Display for JPLEphemHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (integrated {}), {} to {} (JD {} to {})",
            self.version,
            self.creation_date,
            self.start_ephem,
            self.end_ephem,
            self.start_jd,
            self.end_jd
        )
    }
}
