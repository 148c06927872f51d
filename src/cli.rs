//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::RenderConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ripplefield")]
#[command(about = "Interactive lake, ocean and trampoline surface shading", long_about = None)]
pub struct Args {
    /// WGSL vertex shader (entry point `vs_main`)
    pub vertex_shader: PathBuf,

    /// WGSL fragment shader (entry point `fs_main`)
    pub fragment_shader: PathBuf,

    /// Light probe image used as the environment map
    pub light_probe: PathBuf,

    /// Normal map image applied to the surface
    pub normal_map: PathBuf,

    /// Seed for wave generation (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Surface quads along each axis
    #[arg(long, value_name = "QUADS", default_value = "400")]
    pub tessellation: u32,

    /// Initial window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "640")]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "480")]
    pub height: u32,
}

impl Args {
    /// Render configuration with command-line overrides applied
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            tessellation_x: self.tessellation.max(1),
            tessellation_z: self.tessellation.max(1),
            ..RenderConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_positional_paths() {
        let args = Args::try_parse_from(["ripplefield", "a.wgsl", "b.wgsl", "probe.png", "normal.png"])
            .unwrap();
        assert_eq!(args.vertex_shader, PathBuf::from("a.wgsl"));
        assert_eq!(args.normal_map, PathBuf::from("normal.png"));
        assert_eq!(args.seed, None);

        let config = args.render_config();
        assert_eq!(config.tessellation_x, 400);
        assert_eq!(config.window_width, 640);
    }

    #[test]
    fn test_missing_paths_rejected() {
        assert!(Args::try_parse_from(["ripplefield", "a.wgsl", "b.wgsl"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "ripplefield",
            "a.wgsl",
            "b.wgsl",
            "p.png",
            "n.png",
            "--seed",
            "9",
            "--tessellation",
            "0",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.render_config().tessellation_z, 1);
    }
}
