use crate::color::Rgb;
use crate::physics::Trajectory;
use crate::rendering::Image;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ImageEncoder, RgbImage};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Ppm,
    Csv,
}

/// Image and trajectory import/export utilities
pub struct ImportExport;

impl ImportExport {
    /// Channel bytes of `image`, row-major, clamped to [0, 1] and scaled by 255.
    pub fn to_bytes(image: &Image) -> Vec<u8> {
        image.pixels().iter().flat_map(|c| c.to_bytes()).collect()
    }

    /// Write a binary P6 pixmap.
    pub fn export_ppm<P: AsRef<Path>>(image: &Image, path: P) -> ExportResult<()> {
        let bytes = Self::to_bytes(image);
        let writer = BufWriter::new(File::create(path)?);
        PnmEncoder::new(writer)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
            .write_image(
                &bytes,
                image.width() as u32,
                image.height() as u32,
                ColorType::Rgb8,
            )?;
        Ok(())
    }

    /// Read a pixmap back as 8-bit RGB.
    pub fn read_ppm<P: AsRef<Path>>(path: P) -> ExportResult<RgbImage> {
        let decoded = image::io::Reader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(decoded.into_rgb8())
    }

    pub fn import_ppm<P: AsRef<Path>>(path: P) -> ExportResult<Image> {
        let rgb = Self::read_ppm(path)?;
        let (w, h) = (rgb.width() as usize, rgb.height() as usize);
        let pixels = rgb.pixels().map(|p| Rgb::from_bytes(p.0)).collect();
        Image::from_pixels(w, h, pixels).ok_or_else(|| ExportError::Malformed {
            line: 0,
            reason: format!("pixel data does not match {w}x{h}"),
        })
    }

    /// Write one `x,y,r,g,b` record per pixel, channels as stored with four
    /// decimals.
    pub fn export_csv<P: AsRef<Path>>(image: &Image, path: P) -> ExportResult<()> {
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "x,y,r,g,b")?;
        for (y, row) in image.rows().enumerate() {
            for (x, c) in row.iter().enumerate() {
                writeln!(file, "{},{},{:.4},{:.4},{:.4}", x, y, c.r, c.g, c.b)?;
            }
        }
        file.flush()?;
        Ok(())
    }

    /// Parse a per-pixel CSV. The image size is taken from the largest
    /// coordinates; every pixel must appear exactly once.
    pub fn import_csv<P: AsRef<Path>>(path: P) -> ExportResult<Image> {
        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();
        let (mut width, mut height) = (0usize, 0usize);

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if idx == 0 {
                if line.trim() != "x,y,r,g,b" {
                    return Err(malformed(line_no, "expected header x,y,r,g,b"));
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 5 {
                return Err(malformed(line_no, "expected 5 fields"));
            }
            let x: usize = fields[0]
                .parse()
                .map_err(|_| malformed(line_no, "invalid x"))?;
            let y: usize = fields[1]
                .parse()
                .map_err(|_| malformed(line_no, "invalid y"))?;
            let mut channels = [0.0; 3];
            for (slot, field) in channels.iter_mut().zip(&fields[2..]) {
                *slot = field
                    .parse()
                    .map_err(|_| malformed(line_no, "invalid channel value"))?;
            }

            let x_end = x
                .checked_add(1)
                .ok_or_else(|| malformed(line_no, "x out of range"))?;
            let y_end = y
                .checked_add(1)
                .ok_or_else(|| malformed(line_no, "y out of range"))?;
            width = width.max(x_end);
            height = height.max(y_end);
            records.push((line_no, x, y, Rgb::new(channels[0], channels[1], channels[2])));
        }

        let pixel_count = width
            .checked_mul(height)
            .ok_or_else(|| malformed(0, &format!("{width}x{height} image is too large")))?;
        if records.len() != pixel_count {
            return Err(malformed(
                0,
                &format!("{} records for a {width}x{height} image", records.len()),
            ));
        }

        let mut seen = vec![false; pixel_count];
        let mut image = Image::new(width, height);
        for (line_no, x, y, c) in records {
            let index = y * width + x;
            if seen[index] {
                return Err(malformed(line_no, &format!("duplicate pixel ({x}, {y})")));
            }
            seen[index] = true;
            image.set(x, y, c);
        }
        Ok(image)
    }

    /// Write trajectory samples as CSV, one row per point.
    pub fn export_trajectory<P: AsRef<Path>>(trajectory: &Trajectory, path: P) -> ExportResult<()> {
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "lambda,t,r,theta,phi,x,y,z")?;
        for p in &trajectory.points {
            writeln!(
                file,
                "{:e},{:e},{:e},{:.6},{:.6},{:e},{:e},{:e}",
                p.lambda, p.t, p.r, p.theta, p.phi, p.x, p.y, p.z
            )?;
        }
        file.flush()?;
        Ok(())
    }

    /// Determine file format from extension
    pub fn detect_format<P: AsRef<Path>>(path: P) -> Option<FileFormat> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "ppm" | "pnm" => Some(FileFormat::Ppm),
                "csv" | "txt" => Some(FileFormat::Csv),
                _ => None,
            })
    }

    /// Export an image in the format given by the extension
    pub fn export_auto<P: AsRef<Path>>(image: &Image, path: P) -> ExportResult<()> {
        match Self::detect_format(&path) {
            Some(FileFormat::Ppm) => Self::export_ppm(image, path),
            Some(FileFormat::Csv) => Self::export_csv(image, path),
            None => Err(ExportError::UnsupportedFormat(path.as_ref().to_path_buf())),
        }
    }

    pub fn import_auto<P: AsRef<Path>>(path: P) -> ExportResult<Image> {
        match Self::detect_format(&path) {
            Some(FileFormat::Ppm) => Self::import_ppm(path),
            Some(FileFormat::Csv) => Self::import_csv(path),
            None => Err(ExportError::UnsupportedFormat(path.as_ref().to_path_buf())),
        }
    }
}

fn malformed(line: usize, reason: &str) -> ExportError {
    ExportError::Malformed {
        line,
        reason: reason.to_string(),
    }
}
