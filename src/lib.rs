pub mod catalog;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

pub use config::{Config, LayoutConfig, load_config};
pub use ir::Architecture;
pub use layout::{LayoutError, PageLayout, compute_layout, compute_page_layout};
pub use parser::{ParseError, parse_architecture};
pub use render::render_document;
pub use theme::Theme;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Per-call rendering knobs.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn azure() -> Self {
        Self::default()
    }

    pub fn monochrome() -> Self {
        Self {
            theme: Theme::monochrome(),
            ..Self::default()
        }
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
        }
    }
}

/// Renders `architecture` as a draw.io document with the default options.
pub fn generate(architecture: &Architecture) -> Result<String, Error> {
    generate_with_options(architecture, &RenderOptions::default())
}

pub fn generate_with_options(
    architecture: &Architecture,
    options: &RenderOptions,
) -> Result<String, Error> {
    let pages = compute_layout(architecture, &options.layout)?;
    Ok(render_document(&pages, &options.theme, &options.layout))
}

/// Reads an architecture from collaborator text and renders it.
pub fn generate_from_str(input: &str, options: &RenderOptions) -> Result<String, Error> {
    let architecture = parse_architecture(input)?;
    generate_with_options(&architecture, options)
}
