//! In-memory SPK kernel and its [`PositionOracle`] implementation.
//!
//! Loading walks the whole DAF container once:
//! 1. file record ([`DAFHeader`]), rejected unless it is a little-endian SPK,
//! 2. comment area, searched for the JPL text header (optional),
//! 3. the chain of summary records, starting at `fward`,
//! 4. for each type 2/3 segment, its directory footer and every Chebyshev record.
//!
//! Segments of other data types are skipped with a warning. Positions are then served
//! from memory: a target is evaluated in its segment and the center's own position is
//! added recursively until the Solar System Barycenter (id 0) is reached.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
};

use camino::Utf8Path;
use hifitime::Epoch;
use nalgebra::Vector3;
use nom::number::complete::le_f64;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    bodies::Body,
    constants::Kilometer,
    jpl_ephem::PositionOracle,
    syzygy_errors::{OracleError, SyzygyError},
    time::format_utc,
};

use super::{
    daf_header::{DAFHeader, RECORD_BYTES},
    directory::DirectoryData,
    ephemeris_record::EphemerisRecord,
    jpl_ephem_header::JPLEphemHeader,
    naif_ids::NaifIds,
    summary_record::{SpkDataType, Summary},
};

/// NAIF id of the Solar System Barycenter, root of every center chain.
const SSB_ID: i32 = 0;

/// Longest center chain followed before giving up (DE kernels need at most 2 hops).
const MAX_CENTER_DEPTH: usize = 8;

#[derive(Debug, Clone)]
struct Segment {
    summary: Summary,
    data_type: SpkDataType,
    directory: DirectoryData,
    records: Vec<EphemerisRecord>,
}

impl Segment {
    fn position(&self, et_seconds: f64) -> Vector3<Kilometer> {
        self.records[self.directory.record_index(et_seconds)].position(et_seconds)
    }
}

/// One row of the segment listing, see [`NaifData::segments`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentInfo {
    pub target: i32,
    pub target_name: String,
    pub center: i32,
    pub center_name: String,
    pub data_type: i32,
    pub frame: i32,
    pub start_utc: String,
    pub end_utc: String,
    pub n_records: usize,
    pub record_days: f64,
}

/// A loaded SPK kernel.
#[derive(Debug, Clone)]
pub struct NaifData {
    daf_header: DAFHeader,
    header: Option<JPLEphemHeader>,
    // target id -> segments in file order
    segments: HashMap<i32, Vec<Segment>>,
}

fn parse_error(context: &str, e: nom::Err<nom::error::Error<&[u8]>>) -> SyzygyError {
    let reason = match e {
        nom::Err::Incomplete(_) => "truncated input".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => format!("{:?}", e.code),
    };
    SyzygyError::EphemFileParse(format!("{context}: {reason}"))
}

fn naif_name(id: i32) -> String {
    NaifIds::from_id(id)
        .map(|naif| naif.name().to_string())
        .unwrap_or_else(|_| id.to_string())
}

impl NaifData {
    /// Load every supported segment of the kernel at `file_path`.
    ///
    /// Arguments
    /// -----------------
    /// * `file_path`: location of a `.bsp` kernel.
    ///
    /// Return
    /// ----------
    /// * The loaded kernel, [`SyzygyError::JPLFileNotFound`] when the file does not exist,
    ///   or [`SyzygyError::EphemFileParse`] when its layout is inconsistent.
    pub fn read_naif_file(file_path: &Utf8Path) -> Result<Self, SyzygyError> {
        if !file_path.is_file() {
            return Err(SyzygyError::JPLFileNotFound(file_path.to_string()));
        }
        info!(path = %file_path, "loading SPK kernel");
        let mut file = BufReader::new(File::open(file_path)?);
        let data = NaifData::from_reader(&mut file)?;

        match &data.header {
            Some(header) => info!("{header}"),
            None => debug!("no JPL header in the comment area"),
        }
        info!(
            targets = data.segments.len(),
            segments = data.segments.values().map(Vec::len).sum::<usize>(),
            "kernel loaded"
        );
        Ok(data)
    }

    /// Same as [`NaifData::read_naif_file`], from any seekable byte source.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self, SyzygyError> {
        let mut record = [0u8; RECORD_BYTES];
        reader.seek(SeekFrom::Start(0))?;
        reader.read_exact(&mut record)?;
        let (_, daf_header) =
            DAFHeader::parse(&record).map_err(|e| parse_error("file record", e))?;
        daf_header.check_spk()?;
        debug!("{daf_header}");

        let header = NaifData::read_comment_header(reader, &daf_header)?;
        let file_words = reader.seek(SeekFrom::End(0))? / 8;

        let mut segments: HashMap<i32, Vec<Segment>> = HashMap::new();
        for summary in NaifData::read_summaries(reader, &daf_header)? {
            let data_type = match SpkDataType::try_from(summary.data_type) {
                Ok(data_type) => data_type,
                Err(e) => {
                    warn!("skipping segment {summary}: {e}");
                    continue;
                }
            };

            if summary.initial_addr < 1 || summary.final_addr <= summary.initial_addr {
                return Err(SyzygyError::EphemFileParse(format!(
                    "segment {summary} has invalid addresses {}..{}",
                    summary.initial_addr, summary.final_addr
                )));
            }

            if summary.final_addr as u64 > file_words {
                return Err(SyzygyError::EphemFileParse(format!(
                    "segment {summary} ends at word {}, past the end of the file ({file_words} words)",
                    summary.final_addr
                )));
            }

            let directory = DirectoryData::parse(reader, summary.final_addr as usize)?;
            let segment_words = (summary.final_addr - summary.initial_addr + 1) as usize;
            let announced_words = directory
                .rsize
                .checked_mul(directory.n_records)
                .and_then(|words| words.checked_add(4));
            if announced_words != Some(segment_words) {
                return Err(SyzygyError::EphemFileParse(format!(
                    "segment {summary} spans {segment_words} words, directory announces {}",
                    directory
                )));
            }

            let records = EphemerisRecord::parse(
                reader,
                summary.initial_addr as usize,
                directory.rsize,
                directory.n_records,
                data_type.n_components(),
            )?;
            debug!("{summary}: {directory}");

            segments.entry(summary.target).or_default().push(Segment {
                summary,
                data_type,
                directory,
                records,
            });
        }

        Ok(NaifData {
            daf_header,
            header,
            segments,
        })
    }

    fn read_comment_header<R: Read + Seek>(
        reader: &mut R,
        daf_header: &DAFHeader,
    ) -> Result<Option<JPLEphemHeader>, SyzygyError> {
        let comment_bytes = (daf_header.fward as usize - 2) * RECORD_BYTES;
        if comment_bytes == 0 {
            return Ok(None);
        }

        let mut buffer = vec![0u8; comment_bytes];
        reader.seek(SeekFrom::Start(RECORD_BYTES as u64))?;
        reader.read_exact(&mut buffer)?;
        let comments =
            String::from_utf8_lossy(&buffer).replace(|c: char| c == '\0' || c == '\u{4}', "\n");

        Ok(JPLEphemHeader::parse(&comments).ok().map(|(_, header)| header))
    }

    fn read_summaries<R: Read + Seek>(
        reader: &mut R,
        daf_header: &DAFHeader,
    ) -> Result<Vec<Summary>, SyzygyError> {
        let summary_bytes = daf_header.summary_bytes();
        let mut summaries = Vec::new();
        let mut visited = HashSet::new();
        let mut next = daf_header.fward as usize;
        let mut record = [0u8; RECORD_BYTES];

        while next != 0 {
            if !visited.insert(next) {
                return Err(SyzygyError::EphemFileParse(format!(
                    "summary record {next} is linked twice"
                )));
            }
            reader.seek(SeekFrom::Start(((next - 1) * RECORD_BYTES) as u64))?;
            reader.read_exact(&mut record)?;

            // control words: next record, previous record, number of summaries
            let (input, next_record) =
                le_f64::<_, nom::error::Error<&[u8]>>(record.as_slice())
                    .map_err(|e| parse_error("summary control words", e))?;
            let (input, _) = le_f64::<_, nom::error::Error<&[u8]>>(input)
                .map_err(|e| parse_error("summary control words", e))?;
            let (_, nsum) = le_f64::<_, nom::error::Error<&[u8]>>(input)
                .map_err(|e| parse_error("summary control words", e))?;

            let nsum = nsum as usize;
            if 24 + nsum * summary_bytes > RECORD_BYTES {
                return Err(SyzygyError::EphemFileParse(format!(
                    "summary record {next} announces {nsum} summaries"
                )));
            }

            for i in 0..nsum {
                let start = 24 + i * summary_bytes;
                let (_, summary) = Summary::parse(&record[start..start + summary_bytes])
                    .map_err(|e| parse_error("segment summary", e))?;
                summaries.push(summary);
            }

            next = next_record as usize;
        }

        Ok(summaries)
    }

    pub fn daf_header(&self) -> &DAFHeader {
        &self.daf_header
    }

    pub fn jpl_header(&self) -> Option<&JPLEphemHeader> {
        self.header.as_ref()
    }

    /// NAIF ids that have at least one segment in the kernel, sorted.
    pub fn targets(&self) -> Vec<i32> {
        let mut targets: Vec<i32> = self.segments.keys().copied().collect();
        targets.sort_unstable();
        targets
    }

    /// Description of every loaded segment, sorted by target then start epoch.
    pub fn segments(&self) -> Vec<SegmentInfo> {
        let mut infos: Vec<SegmentInfo> = self
            .segments
            .values()
            .flatten()
            .map(|segment| {
                let summary = &segment.summary;
                SegmentInfo {
                    target: summary.target,
                    target_name: naif_name(summary.target),
                    center: summary.center,
                    center_name: naif_name(summary.center),
                    data_type: segment.data_type as i32,
                    frame: summary.frame_id,
                    start_utc: format_utc(&Epoch::from_et_seconds(summary.start_epoch)),
                    end_utc: format_utc(&Epoch::from_et_seconds(summary.end_epoch)),
                    n_records: segment.directory.n_records,
                    record_days: segment.directory.intlen / 86_400.0,
                }
            })
            .collect();
        infos.sort_by(|a, b| {
            a.target
                .cmp(&b.target)
                .then_with(|| a.start_utc.cmp(&b.start_utc))
        });
        infos
    }

    /// Earliest start and latest end of the segments of `target`, in ET seconds.
    fn target_span(&self, target: i32) -> Option<(f64, f64)> {
        let segments = self.segments.get(&target)?;
        let start = segments
            .iter()
            .map(|s| s.summary.start_epoch)
            .fold(f64::INFINITY, f64::min);
        let end = segments
            .iter()
            .map(|s| s.summary.end_epoch)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((start, end))
    }

    /// Barycentric position of `target` at `et_seconds`, following the center chain.
    ///
    /// When several segments cover the epoch, the one loaded last wins.
    fn position_wrt_ssb(
        &self,
        target: i32,
        et_seconds: f64,
        depth: usize,
    ) -> Result<Vector3<Kilometer>, OracleError> {
        if target == SSB_ID {
            return Ok(Vector3::zeros());
        }
        if depth > MAX_CENTER_DEPTH {
            return Err(OracleError::BrokenCenterChain(target));
        }

        let segments = self
            .segments
            .get(&target)
            .ok_or(OracleError::MissingSegment(target))?;

        let Some(segment) = segments.iter().rev().find(|s| s.summary.covers(et_seconds)) else {
            let (start, end) = self
                .target_span(target)
                .ok_or(OracleError::MissingSegment(target))?;
            return Err(OracleError::OutOfCoverage {
                epoch: Epoch::from_et_seconds(et_seconds),
                start: Epoch::from_et_seconds(start),
                end: Epoch::from_et_seconds(end),
            });
        };

        let center = segment.summary.center;
        let center_position = match self.position_wrt_ssb(center, et_seconds, depth + 1) {
            Err(OracleError::MissingSegment(missing)) if missing == center => {
                return Err(OracleError::BrokenCenterChain(target))
            }
            other => other?,
        };

        Ok(segment.position(et_seconds) + center_position)
    }
}

impl PositionOracle for NaifData {
    /// Known names and ids resolve to their canonical name; any other integer resolves
    /// when the kernel holds a segment for it.
    fn resolve(&self, name: &str) -> Result<Body, OracleError> {
        let (canonical, id) = match name.parse::<NaifIds>() {
            Ok(naif) => (naif.name().to_string(), naif.to_id()),
            Err(unknown) => match name.trim().parse::<i32>() {
                Ok(id) => (id.to_string(), id),
                Err(_) => return Err(unknown),
            },
        };

        if id != SSB_ID && !self.segments.contains_key(&id) {
            return Err(OracleError::MissingSegment(id));
        }
        Ok(Body::new(canonical, id))
    }

    fn position_km(&self, body: &Body, instant: Epoch) -> Result<Vector3<Kilometer>, OracleError> {
        self.position_wrt_ssb(body.code(), instant.to_et_seconds(), 0)
    }

    /// Window in which every target of the kernel is covered.
    fn coverage(&self) -> Option<(Epoch, Epoch)> {
        let (start, end) = self
            .segments
            .keys()
            .filter_map(|target| self.target_span(*target))
            .fold((f64::NEG_INFINITY, f64::INFINITY), |(s, e), (ts, te)| {
                (s.max(ts), e.min(te))
            });
        (start.is_finite() && end.is_finite() && start <= end)
            .then(|| (Epoch::from_et_seconds(start), Epoch::from_et_seconds(end)))
    }
}
