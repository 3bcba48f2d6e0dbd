// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Interleaving channel planes into pixel triples, and handing the
//! result to the PNG encoder.

use std::fs::{self, File};
use std::path::Path;

use image::png::PNGEncoder;
use image::ColorType;
use itertools::izip;

use crate::config::{Channel, ChannelOrder};
use crate::error::{NebulaError, Result};

/// A square 16-bit RGB raster, row-major with the three samples of a
/// pixel next to each other.
#[derive(Clone, Debug, PartialEq)]
pub struct FinalImage {
    size: usize,
    samples: Vec<u16>,
}

impl FinalImage {
    /// Edge length, in pixels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All samples; each row holds 3 * size of them.
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// One row of 3 * size samples.
    pub fn row(&self, row: usize) -> &[u16] {
        let width = 3 * self.size;
        &self.samples[row * width..(row + 1) * width]
    }

    /// Writes the image as a 16-bit RGB PNG.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_png16(path, &self.samples, self.size, self.size)
    }
}

/// Interleaves three size x size planes, given in physical slot order,
/// so that out[row][3 * col + k] = slots[k][row][col].
pub fn assemble(slots: [&[u16]; 3], size: usize) -> Result<FinalImage> {
    for slot in slots.iter() {
        if slot.len() != size * size {
            return Err(NebulaError::ImageShape {
                expected: size * size,
                found: slot.len(),
            });
        }
    }
    let mut samples = Vec::with_capacity(3 * size * size);
    for (a, b, c) in izip!(slots[0], slots[1], slots[2]) {
        samples.push(*a);
        samples.push(*b);
        samples.push(*c);
    }
    Ok(FinalImage { size, samples })
}

/// Places the logical red, green and blue planes into their physical
/// slots and interleaves them.
pub fn assemble_ordered(planes: &[Vec<u16>; 3], order: ChannelOrder, size: usize) -> Result<FinalImage> {
    let [first, second, third] = order.slots();
    let plane = |channel: Channel| planes[channel.index()].as_slice();
    assemble([plane(first), plane(second), plane(third)], size)
}

/// Sends 16-bit RGB samples to the PNG encoder.  PNG stores samples
/// big-endian.
pub fn write_png16<P: AsRef<Path>>(
    path: P,
    samples: &[u16],
    width: usize,
    height: usize,
) -> Result<()> {
    if samples.len() != 3 * width * height {
        return Err(NebulaError::ImageShape {
            expected: 3 * width * height,
            found: samples.len(),
        });
    }
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_be_bytes());
    }
    let output = File::create(path)?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(&bytes, width as u32, height as u32, ColorType::RGB(16))?;
    Ok(())
}

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// A decoded raster as red, green, blue samples at the depth the file
/// stored them in: 16-bit files keep their full values, 8-bit files are
/// widened without rescaling.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbRaster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Three samples per pixel, row-major.
    pub samples: Vec<u16>,
}

/// Reads an image file.  PNGs are decoded at full depth; any other
/// format the `image` crate knows is read as 8-bit RGB.
pub fn read_rgb<P: AsRef<Path>>(path: P) -> Result<RgbRaster> {
    let bytes = fs::read(path)?;
    if bytes.starts_with(&PNG_SIGNATURE) {
        return read_png(&bytes);
    }
    let source = image::load_from_memory(&bytes)?.to_rgb();
    let (width, height) = source.dimensions();
    Ok(RgbRaster {
        width,
        height,
        samples: source.into_raw().into_iter().map(u16::from).collect(),
    })
}

// Palettes and sub-byte depths are expanded to 8 bits; 16-bit samples
// arrive big-endian and are kept as they are.  Gray is copied into all
// three channels and alpha is dropped.
fn read_png(bytes: &[u8]) -> Result<RgbRaster> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND);
    let (info, mut reader) = decoder.read_info()?;
    let (color, depth) = reader.output_color_type();
    let mut data = vec![0; reader.output_buffer_size()];
    reader.next_frame(&mut data)?;

    let values: Vec<u16> = match depth {
        png::BitDepth::Sixteen => data
            .chunks(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect(),
        _ => data.into_iter().map(u16::from).collect(),
    };
    let channels = color.samples();
    let mut samples = Vec::with_capacity(values.len() / channels * 3);
    for px in values.chunks(channels) {
        if channels < 3 {
            samples.extend_from_slice(&[px[0], px[0], px[0]]);
        } else {
            samples.extend_from_slice(&px[..3]);
        }
    }
    Ok(RgbRaster {
        width: info.width,
        height: info.height,
        samples,
    })
}

/// Reorders red, green, blue samples into the swap tool's blue, red,
/// green slot order.
pub fn swap_channels(rgb: &[u16]) -> Vec<u16> {
    let mut swapped = Vec::with_capacity(rgb.len());
    for px in rgb.chunks(3) {
        let (red, green, blue) = (px[0], px[1], px[2]);
        swapped.extend_from_slice(&[blue, red, green]);
    }
    swapped
}

/// Reads an image, swaps its channels, and writes it back out as a
/// 16-bit PNG.
pub fn swap_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<(u32, u32)> {
    let source = read_rgb(input)?;
    let samples = swap_channels(&source.samples);
    write_png16(output, &samples, source.width as usize, source.height as usize)?;
    Ok((source.width, source.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_interleaved_by_slot() {
        let a = [1, 2, 3, 4];
        let b = [10, 20, 30, 40];
        let c = [100, 200, 300, 400];
        let image = assemble([&a, &b, &c], 2).unwrap();
        assert_eq!(image.row(0), &[1, 10, 100, 2, 20, 200]);
        assert_eq!(image.row(1), &[3, 30, 300, 4, 40, 400]);
    }

    #[test]
    fn the_default_order_puts_blue_first() {
        let planes = [vec![1, 1, 1, 1], vec![2, 2, 2, 2], vec![3, 3, 3, 3]];
        let image = assemble_ordered(&planes, ChannelOrder::default(), 2).unwrap();
        assert_eq!(image.row(0), &[3, 2, 1, 3, 2, 1]);
        let image = assemble_ordered(&planes, ChannelOrder::Brg, 2).unwrap();
        assert_eq!(image.row(1), &[3, 1, 2, 3, 1, 2]);
    }

    #[test]
    fn mismatched_planes_are_rejected() {
        let a = [1, 2, 3, 4];
        let short = [1, 2, 3];
        assert!(assemble([&a, &short, &a], 2).is_err());
    }

    #[test]
    fn swapping_moves_blue_to_the_front() {
        assert_eq!(swap_channels(&[10, 20, 30, 1, 2, 3]), vec![30, 10, 20, 3, 1, 2]);
    }

    #[test]
    fn sixteen_bit_renders_swap_at_full_depth() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("render.png");
        let output = dir.path().join("swapped.png");
        write_png16(&input, &[65535, 1000, 40000, 7, 8, 300], 2, 1).unwrap();
        assert_eq!(
            read_rgb(&input).unwrap().samples,
            vec![65535, 1000, 40000, 7, 8, 300]
        );

        assert_eq!(swap_file(&input, &output).unwrap(), (2, 1));
        let swapped = read_rgb(&output).unwrap();
        assert_eq!((swapped.width, swapped.height), (2, 1));
        assert_eq!(swapped.samples, vec![40000, 65535, 1000, 300, 7, 8]);
    }

    #[test]
    fn a_written_image_reads_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.png");
        let a = [0, 1, 2, 3];
        let b = [256, 4096, 32768, 65535];
        let c = [65534, 255, 254, 9];
        assemble([&a, &b, &c], 2).unwrap().write_png(&path).unwrap();
        let raster = read_rgb(&path).unwrap();
        assert_eq!(
            raster.samples,
            vec![0, 256, 65534, 1, 4096, 255, 2, 32768, 254, 3, 65535, 9]
        );
    }
}
