//! Tests for run termination states and the reusable generator

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use patterntile::enhance::EnhanceFactors;
    use patterntile::io::error::invalid_parameter;
    use patterntile::io::progress::{ProgressEvent, SilentReporter};
    use patterntile::math::PixelLayout;
    use patterntile::pipeline::PatternGenerator;
    use patterntile::spatial::TileGrid;
    use patterntile::{PatternConfig, PatternError, PatternSummary, Result, Termination};
    use std::path::PathBuf;

    fn small_config() -> PatternConfig {
        PatternConfig::default()
            .with_pattern_size(2.0, 1.0)
            .with_repeat_every(0.5)
            .with_fallback_dpi(25.4)
            .with_enhancement(EnhanceFactors::identity())
    }

    // Tests each error maps to its terminal state
    // Verified by classifying FileSystem errors as decode errors
    #[test]
    fn test_termination_from_error() {
        let cases = [
            (
                PatternError::MissingInput {
                    path: PathBuf::from("a.jpg"),
                },
                Termination::AbortedMissingInput,
            ),
            (
                PatternError::ImageLoad {
                    path: PathBuf::from("a.jpg"),
                    source: image::ImageError::IoError(std::io::Error::other("bad")),
                },
                Termination::AbortedDecodeError,
            ),
            (
                PatternError::FileSystem {
                    path: PathBuf::from("out.tiff"),
                    operation: "create staging file",
                    source: std::io::Error::other("denied"),
                },
                Termination::AbortedSaveError,
            ),
            (
                PatternError::ImageExport {
                    path: PathBuf::from("out.tiff"),
                    source: tiff::TiffError::IoError(std::io::Error::other("full")),
                },
                Termination::AbortedSaveError,
            ),
            (
                invalid_parameter("repeat_every_cm", &0.0, &"must be positive"),
                Termination::AbortedInvalidConfiguration,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(Termination::from_error(&error), expected, "{error}");
            assert!(!expected.is_success());
        }
    }

    // Tests results classify as saved only on success
    // Verified by treating every result as saved
    #[test]
    fn test_termination_of_result() {
        let ok: Result<u8> = Ok(1);
        let failed: Result<u8> = Err(PatternError::MissingInput {
            path: PathBuf::from("a.jpg"),
        });

        assert_eq!(Termination::of(&ok), Termination::Saved);
        assert!(Termination::of(&ok).is_success());
        assert_eq!(Termination::of(&failed), Termination::AbortedMissingInput);
    }

    // Tests the summary tile count follows its grid
    // Verified by counting only full tiles
    #[test]
    fn test_summary_tiles_placed() {
        let layout = PixelLayout {
            canvas_width: 10,
            canvas_height: 7,
            tile_size: 4,
        };
        let summary = PatternSummary {
            output_path: PathBuf::from("out.tiff"),
            resolution: patterntile::io::image::Resolution::resolve(None, 300.0),
            input_size_cm: (1.0, 1.0),
            layout,
            grid: TileGrid::from_layout(&layout),
        };

        assert_eq!(summary.tiles_placed(), 6);
    }

    // Tests a generator runs repeatedly with its own reporter
    // Verified by sharing one output path between runs
    #[test]
    fn test_generator_repeated_runs() {
        let Ok(directory) = tempfile::tempdir() else {
            unreachable!("Temporary directory should be creatable");
        };
        let input = directory.path().join("tile.png");
        let source = RgbImage::from_fn(6, 6, |x, y| Rgb([(x * 40) as u8, (y * 40) as u8, 90]));
        assert!(source.save(&input).is_ok());

        let mut events = Vec::new();
        let mut generator = PatternGenerator::new(small_config(), |event: &ProgressEvent| {
            events.push(event.clone());
        });
        assert_eq!(generator.config(), &small_config());

        let first = directory.path().join("first.tiff");
        let second = directory.path().join("second.tiff");
        let Ok(summary) = generator.generate(&input, &first) else {
            unreachable!("First run should succeed");
        };
        assert!(generator.generate(&input, &second).is_ok());
        drop(generator.into_reporter());

        // 2 x 1 cm at 25.4 dpi is 20 x 10 px, tiles of 5 px
        assert_eq!(summary.layout.canvas(), (20, 10));
        assert_eq!(summary.layout.tile_size, 5);
        assert_eq!(summary.tiles_placed(), 8);
        assert!(first.exists());
        assert!(second.exists());

        let started = events
            .iter()
            .filter(|event| **event == ProgressEvent::Started)
            .count();
        assert_eq!(started, 2);
    }

    // Tests an invalid configuration aborts before touching the input
    // Verified by validating after opening the input
    #[test]
    fn test_generator_rejects_invalid_config() {
        let Ok(directory) = tempfile::tempdir() else {
            unreachable!("Temporary directory should be creatable");
        };
        let output = directory.path().join("never.tiff");
        let mut generator =
            PatternGenerator::new(small_config().with_repeat_every(-1.0), SilentReporter);

        let result = generator.generate(directory.path().join("absent.jpg"), &output);

        assert_eq!(Termination::of(&result), Termination::AbortedInvalidConfiguration);
        assert!(!output.exists());
    }
}
