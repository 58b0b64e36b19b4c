/// One RGBA8 level of a mip chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Levels in a full chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Reduce `base` (RGBA8, `width * height`) into every level below it.
///
/// Each texel averages its 2x2 footprint in the previous level; odd edges
/// reuse the last row or column. The returned chain excludes the base level.
pub fn build_mip_chain(base: &[u8], width: u32, height: u32) -> Vec<MipLevel> {
    let count = mip_level_count(width, height);
    let mut chain: Vec<MipLevel> = Vec::with_capacity(count.saturating_sub(1) as usize);

    let (mut src_w, mut src_h) = (width, height);
    for _ in 1..count {
        let src = chain.last().map_or(base, |level| level.data.as_slice());
        let level = downsample(src, src_w, src_h);
        src_w = level.width;
        src_h = level.height;
        chain.push(level);
    }
    chain
}

fn downsample(src: &[u8], src_w: u32, src_h: u32) -> MipLevel {
    let width = (src_w / 2).max(1);
    let height = (src_h / 2).max(1);
    let mut data = vec![0u8; (width * height * 4) as usize];

    let texel = |x: u32, y: u32, c: usize| -> u32 {
        let x = x.min(src_w - 1);
        let y = y.min(src_h - 1);
        src[((y * src_w + x) * 4) as usize + c] as u32
    };

    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = (x * 2, y * 2);
            for c in 0..4 {
                let sum = texel(sx, sy, c)
                    + texel(sx + 1, sy, c)
                    + texel(sx, sy + 1, c)
                    + texel(sx + 1, sy + 1, c);
                data[((y * width + x) * 4) as usize + c] = ((sum + 2) / 4) as u8;
            }
        }
    }

    MipLevel {
        width,
        height,
        data,
    }
}
