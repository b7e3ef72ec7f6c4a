use clap::Parser;
use roimerge::replay::run_ticks_dyn;
use roimerge::{
    Classification, ClassificationList, DynNode, InputSet, Landmark, LandmarkList,
    MergeByLargerOptions, MinSizeOptions, NodeDecl, NodeOptions, NodeRegistry, NormalizedLandmark,
    NormalizedLandmarkList, NormalizedRect, Packet, Payload, PayloadKind, PortTag,
    RoiMergeOptions, Side, Timestamp,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "RoiMerge CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output, including duplicate-region warnings.
    #[arg(long)]
    trace: bool,
    /// List registered node names and exit.
    #[arg(long)]
    list_nodes: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SideConfig {
    #[default]
    Left,
    Right,
}

impl From<SideConfig> for Side {
    fn from(value: SideConfig) -> Self {
        match value {
            SideConfig::Left => Side::Left,
            SideConfig::Right => Side::Right,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OptionsJson {
    min_size: usize,
    prefer: SideConfig,
    center_grid_scale: u32,
}

impl Default for OptionsJson {
    fn default() -> Self {
        let cfg = NodeOptions::default();
        Self {
            min_size: cfg.min_size.min_size,
            prefer: SideConfig::Left,
            center_grid_scale: cfg.roi_merge.center_grid_scale,
        }
    }
}

impl From<OptionsJson> for NodeOptions {
    fn from(value: OptionsJson) -> Self {
        Self {
            min_size: MinSizeOptions {
                min_size: value.min_size,
            },
            merge_by_larger: MergeByLargerOptions {
                prefer: value.prefer.into(),
            },
            roi_merge: RoiMergeOptions {
                center_grid_scale: value.center_grid_scale,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    node: String,
    input_streams: Vec<String>,
    output_streams: Vec<String>,
    options: OptionsJson,
    ticks_path: String,
    output_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct RectRecord {
    x_center: f32,
    y_center: f32,
    width: f32,
    height: f32,
    rotation: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    rect_id: Option<i64>,
}

impl From<RectRecord> for NormalizedRect {
    fn from(value: RectRecord) -> Self {
        Self {
            x_center: value.x_center,
            y_center: value.y_center,
            width: value.width,
            height: value.height,
            rotation: value.rotation,
            rect_id: value.rect_id,
        }
    }
}

impl From<NormalizedRect> for RectRecord {
    fn from(value: NormalizedRect) -> Self {
        Self {
            x_center: value.x_center,
            y_center: value.y_center,
            width: value.width,
            height: value.height,
            rotation: value.rotation,
            rect_id: value.rect_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct LandmarkRecord {
    x: f32,
    y: f32,
    z: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence: Option<f32>,
}

impl From<LandmarkRecord> for Landmark {
    fn from(value: LandmarkRecord) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
            visibility: value.visibility,
            presence: value.presence,
        }
    }
}

impl From<LandmarkRecord> for NormalizedLandmark {
    fn from(value: LandmarkRecord) -> Self {
        Landmark::from(value).into()
    }
}

impl From<Landmark> for LandmarkRecord {
    fn from(value: Landmark) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
            visibility: value.visibility,
            presence: value.presence,
        }
    }
}

impl From<NormalizedLandmark> for LandmarkRecord {
    fn from(value: NormalizedLandmark) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
            visibility: value.visibility,
            presence: value.presence,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
struct ClassificationRecord {
    index: i32,
    score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl From<ClassificationRecord> for Classification {
    fn from(value: ClassificationRecord) -> Self {
        Self {
            index: value.index,
            score: value.score,
            label: value.label,
            display_name: value.display_name,
        }
    }
}

impl From<Classification> for ClassificationRecord {
    fn from(value: Classification) -> Self {
        Self {
            index: value.index,
            score: value.score,
            label: value.label,
            display_name: value.display_name,
        }
    }
}

/// One recorded tick; ports missing from `inputs` or set to null are absent.
#[derive(Debug, Deserialize)]
struct TickRecord {
    timestamp: i64,
    #[serde(default)]
    inputs: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
struct OutputRecord {
    timestamp: i64,
    output: Option<Value>,
}

fn convert_all<A, B: From<A>>(items: Vec<A>) -> Vec<B> {
    items.into_iter().map(B::from).collect()
}

fn decode_payload(kind: PayloadKind, value: Value) -> Result<Payload, serde_json::Error> {
    let payload = match kind {
        PayloadKind::NormalizedRectVec => {
            Payload::Rects(convert_all(serde_json::from_value::<Vec<RectRecord>>(value)?))
        }
        PayloadKind::NormalizedLandmarkListVec => Payload::NormalizedLandmarkLists(
            serde_json::from_value::<Vec<Vec<LandmarkRecord>>>(value)?
                .into_iter()
                .map(|list| NormalizedLandmarkList::new(convert_all(list)))
                .collect(),
        ),
        PayloadKind::ClassificationListVec => Payload::ClassificationLists(
            serde_json::from_value::<Vec<Vec<ClassificationRecord>>>(value)?
                .into_iter()
                .map(|list| ClassificationList::new(convert_all(list)))
                .collect(),
        ),
        PayloadKind::LandmarkList => {
            let list = serde_json::from_value::<Vec<LandmarkRecord>>(value)?;
            Payload::Landmarks(LandmarkList::new(convert_all(list)))
        }
        PayloadKind::NormalizedLandmarkList => {
            let list = serde_json::from_value::<Vec<LandmarkRecord>>(value)?;
            Payload::NormalizedLandmarks(NormalizedLandmarkList::new(convert_all(list)))
        }
        PayloadKind::Bool => Payload::Flag(serde_json::from_value(value)?),
    };
    Ok(payload)
}

fn encode_payload(payload: Payload) -> Result<Value, serde_json::Error> {
    match payload {
        Payload::Rects(rects) => serde_json::to_value(convert_all::<_, RectRecord>(rects)),
        Payload::NormalizedLandmarkLists(lists) => serde_json::to_value(
            lists
                .into_iter()
                .map(|list| convert_all::<_, LandmarkRecord>(list.landmarks))
                .collect::<Vec<_>>(),
        ),
        Payload::ClassificationLists(lists) => serde_json::to_value(
            lists
                .into_iter()
                .map(|list| convert_all::<_, ClassificationRecord>(list.classifications))
                .collect::<Vec<_>>(),
        ),
        Payload::Landmarks(list) => {
            serde_json::to_value(convert_all::<_, LandmarkRecord>(list.landmarks))
        }
        Payload::NormalizedLandmarks(list) => {
            serde_json::to_value(convert_all::<_, LandmarkRecord>(list.landmarks))
        }
        Payload::Flag(flag) => serde_json::to_value(flag),
    }
}

/// Relative ticks paths are read next to the config file.
fn resolve_ticks_path(config_path: &Path, ticks_path: &str) -> PathBuf {
    let ticks_path = Path::new(ticks_path);
    match config_path.parent() {
        Some(dir) if ticks_path.is_relative() => dir.join(ticks_path),
        _ => ticks_path.to_path_buf(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("roimerge=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let registry = NodeRegistry::with_builtin();
    if cli.list_nodes {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.node.is_empty() || config.ticks_path.is_empty() {
        return Err("node and ticks_path must be set in the config".into());
    }

    let decl = NodeDecl::from_streams(&config.input_streams, &config.output_streams)?;
    let options = NodeOptions::from(config.options);
    let node = registry.build(&config.node, &decl, &options)?;
    let contract = node.ports();

    let ticks_text = fs::read_to_string(resolve_ticks_path(&cli.config, &config.ticks_path))?;
    let ticks: Vec<TickRecord> = serde_json::from_str(&ticks_text)?;

    let mut stamps = Vec::with_capacity(ticks.len());
    let mut input_sets = Vec::with_capacity(ticks.len());
    for tick in ticks {
        let timestamp = Timestamp::new(tick.timestamp);
        let mut set = InputSet::new();
        for (key, value) in tick.inputs {
            if value.is_null() {
                continue;
            }
            let tag: PortTag = key.parse()?;
            let spec = contract.input_spec(tag).ok_or_else(|| {
                format!(
                    "tick {} delivers to port {key}, which {} does not have",
                    tick.timestamp, config.node
                )
            })?;
            set.insert(tag, Packet::new(decode_payload(spec.kind, value)?, timestamp));
        }
        stamps.push(timestamp);
        input_sets.push(set);
    }

    let outputs = run_ticks_dyn(node.as_ref(), input_sets)?;
    let mut records = Vec::with_capacity(outputs.len());
    for (timestamp, output) in stamps.into_iter().zip(outputs) {
        let output = output
            .map(|packet| encode_payload(packet.into_payload()))
            .transpose()?;
        records.push(OutputRecord {
            timestamp: timestamp.value(),
            output,
        });
    }
    let json = serde_json::to_string_pretty(&records)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::resolve_ticks_path;
    use std::path::{Path, PathBuf};

    #[test]
    fn relative_ticks_path_follows_config_dir() {
        let path = resolve_ticks_path(Path::new("roimerge-cli/config.json"), "ticks.json");
        assert_eq!(path, PathBuf::from("roimerge-cli/ticks.json"));

        let path = resolve_ticks_path(Path::new("config.json"), "ticks.json");
        assert_eq!(path, PathBuf::from("ticks.json"));
    }

    #[cfg(unix)]
    #[test]
    fn absolute_ticks_path_is_kept() {
        let path = resolve_ticks_path(Path::new("cfg/config.json"), "/data/ticks.json");
        assert_eq!(path, PathBuf::from("/data/ticks.json"));
    }
}
