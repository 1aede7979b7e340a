use crate::cli::Cli;

pub(crate) fn test_cli() -> Cli {
    Cli {
        condition: None,
        fps: 30,
        assets: None,
        cell_width: 8.0,
        cell_height: 16.0,
        no_animation: false,
        log_file: None,
        one_shot: false,
        frames: 30,
    }
}
