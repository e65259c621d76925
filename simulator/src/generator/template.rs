use std::f32::consts::PI;

/// Raised-cosine sweep in `[0, 1]` repeating every `period` frames, starting at 0.
pub fn sweep(frame: usize, period: usize) -> f32 {
    if period == 0 {
        return 0.0;
    }
    let phase = (frame % period) as f32 / period as f32;
    0.5 - 0.5 * (2.0 * PI * phase).cos()
}
