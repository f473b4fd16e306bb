// THEORY:
// `PngSink` is the runner's display sink. There is no window on a headless
// box, so every annotated frame is written as a numbered PNG in an output
// directory instead. Stitching them back into a video is left to other tools.

use color_tracker::{Frame, FrameRenderer};
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use std::path::{Path, PathBuf};

pub struct PngSink {
    dir: PathBuf,
    prefix: String,
    written: usize,
}

impl PngSink {
    /// Creates `dir` if needed. Files are named `<prefix>_000000.png`, `<prefix>_000001.png`, ...
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.into(),
            written: 0,
        })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    fn next_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}_{:06}.png", self.prefix, self.written))
    }
}

fn save(path: &Path, frame: &Frame) -> Result<(), image::ImageError> {
    let output = std::io::BufWriter::new(std::fs::File::create(path)?);
    let encoder = PngEncoder::new(output);
    encoder.write_image(
        &frame.data,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

impl FrameRenderer for PngSink {
    type Error = image::ImageError;

    fn render(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        let path = self.next_path();
        save(&path, frame)?;
        log::debug!("wrote {}", path.display());
        self.written += 1;
        Ok(())
    }
}
