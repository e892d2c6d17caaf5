use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::debug;

use super::transform::{Composition, Id, Transform};
use crate::bwt_algorithms::bwt_sort::{Bwt, RotationSort};
use crate::error::{CodecError, Result};
use crate::huffman_coding::hfc::Hfc;
use crate::tools::mtf::Mtf;
use crate::tools::rle_packbits::RlePackBits;
use crate::tools::rle_pairs::RlePairs;
use crate::tools::rle_streams::RleStreams;

/// The standard chain, by stage name.
pub const STANDARD_PIPELINE: &str = "rle,bwt,mtf,rle,hfc";

/// A transform that can be named in a pipeline description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PackBits,
    Pairs,
    Streams,
    Bwt,
    Mtf,
    Hfc,
    Id,
}

impl Stage {
    /// Build the transform for this stage. `sort` only matters for the BWT.
    pub fn transform(self, sort: RotationSort) -> Box<dyn Transform> {
        match self {
            Stage::PackBits => Box::new(RlePackBits),
            Stage::Pairs => Box::new(RlePairs),
            Stage::Streams => Box::new(RleStreams::new()),
            Stage::Bwt => Box::new(Bwt::new(sort)),
            Stage::Mtf => Box::new(Mtf),
            Stage::Hfc => Box::new(Hfc),
            Stage::Id => Box::new(Id),
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::PackBits => "rle",
            Stage::Pairs => "pairs",
            Stage::Streams => "streams",
            Stage::Bwt => "bwt",
            Stage::Mtf => "mtf",
            Stage::Hfc => "hfc",
            Stage::Id => "id",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Stage {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rle" | "packbits" => Ok(Stage::PackBits),
            "pairs" => Ok(Stage::Pairs),
            "streams" => Ok(Stage::Streams),
            "bwt" => Ok(Stage::Bwt),
            "mtf" => Ok(Stage::Mtf),
            "hfc" | "huffman" => Ok(Stage::Hfc),
            "id" => Ok(Stage::Id),
            other => Err(CodecError::InvalidOption(format!("unknown stage '{}'", other))),
        }
    }
}

/// Build a Composition from comma separated stage names, in encode order.
pub fn parse_pipeline(list: &str, sort: RotationSort) -> Result<Composition> {
    let stages = list
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(Stage::from_str)
        .collect::<Result<Vec<Stage>>>()?;
    if stages.is_empty() {
        return Err(CodecError::InvalidOption(format!(
            "pipeline '{}' names no stages",
            list
        )));
    }
    debug!(
        "Pipeline: {}",
        stages
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    Ok(stages.into_iter().map(|s| s.transform(sort)).collect())
}

/// RLE, BWT, MTF, RLE, HFC.
pub fn standard_pipeline(sort: RotationSort) -> Composition {
    Composition::new()
        .then(RlePackBits)
        .then(Bwt::new(sort))
        .then(Mtf)
        .then(RlePackBits)
        .then(Hfc)
}
