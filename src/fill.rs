use image::{Rgba, RgbaImage};

/// Result of a flood fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillOutcome {
    /// Pixels repainted with the fill color
    pub pixels_filled: usize,
}

impl FillOutcome {
    pub fn is_noop(&self) -> bool {
        self.pixels_filled == 0
    }
}

/// Color of the pixel at `seed`, if it lies inside the buffer
pub fn target_color(buffer: &RgbaImage, seed: (u32, u32)) -> Option<Rgba<u8>> {
    let (x, y) = seed;
    if x < buffer.width() && y < buffer.height() {
        Some(*buffer.get_pixel(x, y))
    } else {
        None
    }
}

/// 4-connected flood fill starting at `seed`.
///
/// Every pixel reachable through up/down/left/right neighbours whose RGBA
/// exactly matches the seed's original color is repainted with `fill`.
/// Traversal uses an explicit stack so large uniform regions cannot exhaust
/// the call stack. Filling with the color already under the seed, or seeding
/// outside the buffer, writes nothing.
pub fn flood_fill(buffer: &mut RgbaImage, seed: (u32, u32), fill: Rgba<u8>) -> FillOutcome {
    let Some(target) = target_color(buffer, seed) else {
        return FillOutcome::default();
    };
    if target == fill {
        return FillOutcome::default();
    }

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;

    // Visited bitmap indexed by y * width + x
    let mut visited = vec![false; width * height];
    let mut stack: Vec<(u32, u32)> = Vec::with_capacity(1024);

    let seed_index = seed.1 as usize * width + seed.0 as usize;
    visited[seed_index] = true;
    stack.push(seed);

    let mut pixels_filled = 0;
    while let Some((x, y)) = stack.pop() {
        buffer.put_pixel(x, y, fill);
        pixels_filled += 1;

        let neighbours = [
            (x.checked_sub(1), Some(y)),
            (x.checked_add(1), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), y.checked_add(1)),
        ];

        for neighbour in neighbours {
            let (Some(nx), Some(ny)) = neighbour else {
                continue;
            };
            if nx as usize >= width || ny as usize >= height {
                continue;
            }
            let index = ny as usize * width + nx as usize;
            if visited[index] {
                continue;
            }
            if *buffer.get_pixel(nx, ny) == target {
                visited[index] = true;
                stack.push((nx, ny));
            }
        }
    }

    log::debug!(
        "Flood fill at {:?}: {} pixels from {:?} to {:?}",
        seed,
        pixels_filled,
        target.0,
        fill.0
    );

    FillOutcome { pixels_filled }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn test_fill_whole_empty_buffer() {
        let mut buffer = RgbaImage::new(10, 10);
        let outcome = flood_fill(&mut buffer, (0, 0), RED);
        assert_eq!(outcome.pixels_filled, 100);
        assert!(buffer.pixels().all(|p| *p == RED));

        let again = flood_fill(&mut buffer, (0, 0), RED);
        assert!(again.is_noop());
    }

    #[test]
    fn test_fill_stops_at_boundary() {
        // Vertical wall at x = 5 splits the buffer in two
        let mut buffer = RgbaImage::new(10, 10);
        for y in 0..10 {
            buffer.put_pixel(5, y, BLUE);
        }
        let outcome = flood_fill(&mut buffer, (1, 1), RED);
        assert_eq!(outcome.pixels_filled, 50);
        assert_eq!(*buffer.get_pixel(4, 9), RED);
        assert_eq!(*buffer.get_pixel(5, 0), BLUE);
        assert_eq!(*buffer.get_pixel(6, 0), CLEAR);
    }

    #[test]
    fn test_fill_is_four_connected() {
        // Two pixels touching only diagonally
        let mut buffer = RgbaImage::from_pixel(3, 3, BLUE);
        buffer.put_pixel(0, 0, CLEAR);
        buffer.put_pixel(1, 1, CLEAR);
        let outcome = flood_fill(&mut buffer, (0, 0), RED);
        assert_eq!(outcome.pixels_filled, 1);
        assert_eq!(*buffer.get_pixel(1, 1), CLEAR);
    }

    #[test]
    fn test_alpha_is_part_of_the_match() {
        let mut buffer = RgbaImage::new(4, 1);
        buffer.put_pixel(2, 0, Rgba([0, 0, 0, 1]));
        let outcome = flood_fill(&mut buffer, (0, 0), RED);
        assert_eq!(outcome.pixels_filled, 2);
        assert_eq!(*buffer.get_pixel(3, 0), CLEAR);
    }

    #[test]
    fn test_seed_outside_buffer() {
        let mut buffer = RgbaImage::new(4, 4);
        assert!(flood_fill(&mut buffer, (4, 0), RED).is_noop());
        assert!(buffer.pixels().all(|p| *p == CLEAR));
    }

    #[test]
    fn test_large_region_does_not_recurse() {
        let mut buffer = RgbaImage::new(1000, 1000);
        let outcome = flood_fill(&mut buffer, (500, 500), BLUE);
        assert_eq!(outcome.pixels_filled, 1_000_000);
    }
}
