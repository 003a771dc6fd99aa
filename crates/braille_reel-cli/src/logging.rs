use log::LevelFilter;

/// Initialises `pretty_env_logger` with `default` unless `RUST_LOG` is set.
pub fn init(default: LevelFilter) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(default);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
