use mofads::core::io::StructureFormat;
use mofads::engine::config::EngineConfig;
use mofads::engine::request::PlacementRequest;

pub struct AppConfig {
    pub engine_config: EngineConfig,
    /// One request per `-s` species, in command-line order.
    pub requests: Vec<PlacementRequest>,
    /// `None` keeps each input file's own format.
    pub output_format: Option<StructureFormat>,
    pub overlap_warning: f64,
}
