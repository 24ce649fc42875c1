//! Domain-critical regression tests for cell-dither.
//!
//! These tests cover properties that span several modules. Each test
//! documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::animate::{Algorithm, AnimationOptions, Animator};
    use crate::api::DitherEngine;
    use crate::classify::{bucket, classify, CellState};
    use crate::color::Srgb;
    use crate::palette::{Palette, Tone};
    use crate::preprocess::{GridSize, ImageSample, ResampleOptions};

    /// 16x8 image covering dark, accent, blends and unrelated hues.
    fn varied_sample() -> ImageSample {
        let palette = Palette::default();
        let (w, h) = (16, 8);
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                let t = x as f32 / (w - 1) as f32;
                let pixel = match y % 4 {
                    0 => palette.dark().lerp(palette.accent(), t),
                    1 => Srgb::new(t, t, t),
                    2 => Srgb::new(0.0, t, 1.0 - t),
                    _ => Srgb::new(1.0 - t, 0.2, t),
                };
                pixels.push(pixel);
            }
        }
        ImageSample::new(pixels, w, h).unwrap()
    }

    fn blend_sample(ts: &[f32]) -> ImageSample {
        let palette = Palette::default();
        let pixels = ts
            .iter()
            .map(|&t| palette.dark().lerp(palette.accent(), t))
            .collect();
        ImageSample::new(pixels, ts.len(), 1).unwrap()
    }

    // ========================================================================
    // Classification invariants
    // ========================================================================

    /// If this breaks, it means: accent probabilities escaped [0, 1] or a
    /// cell's stored state disagrees with the band its probability falls in.
    #[test]
    fn test_probability_range_and_band_agree() {
        let palette = Palette::default();
        for grid in [GridSize::new(16, 8), GridSize::new(7, 3), GridSize::new(40, 20)] {
            let cells = classify(&varied_sample(), grid, &ResampleOptions::new(), &palette);
            for idx in 0..cells.len() {
                let p = cells.probability(idx);
                assert!((0.0..=1.0).contains(&p), "cell {} has p = {}", idx, p);
                assert_eq!(cells.state(idx), bucket(p), "cell {} (p = {})", idx, p);
            }
        }
    }

    /// If this breaks, it means: the ambiguous index set drifted from the
    /// stored states (missing, duplicated, out of order or extra members),
    /// so the animator would skip or double-render cells.
    #[test]
    fn test_ambiguous_index_set_matches_states() {
        let palette = Palette::default();
        let cells = classify(
            &varied_sample(),
            GridSize::new(32, 16),
            &ResampleOptions::new().threshold(20),
            &palette,
        );

        let set = cells.ambiguous_indices();
        assert!(set.windows(2).all(|w| w[0] < w[1]), "not strictly ascending");
        assert!(set.iter().all(|&i| cells.state(i) == CellState::Ambiguous));

        let counted = (0..cells.len())
            .filter(|&i| cells.state(i).is_ambiguous())
            .count();
        assert_eq!(set.len(), counted);
        assert_eq!(cells.stats().ambiguous, counted);
        assert!(counted > 0, "fixture should contain ambiguous cells");
    }

    /// If this breaks, it means: classification depends on hidden state
    /// (a global, a cache, an RNG) instead of only its inputs.
    #[test]
    fn test_classification_is_idempotent() {
        let palette = Palette::default();
        let options = ResampleOptions::new().threshold(40);
        let a = classify(&varied_sample(), GridSize::new(20, 10), &options, &palette);
        let b = classify(&varied_sample(), GridSize::new(20, 10), &options, &palette);
        assert_eq!(a, b);
    }

    /// If this breaks, it means: a degenerate input (single cell, uniform
    /// image) hits an edge case in resampling or bucketing.
    #[test]
    fn test_degenerate_inputs_classify() {
        let palette = Palette::default();
        let options = ResampleOptions::new();

        let one = classify(&varied_sample(), GridSize::new(1, 1), &options, &palette);
        assert_eq!(one.len(), 1);
        assert_eq!(one.rgba().len(), 4);

        let tiny = ImageSample::solid(palette.accent(), 1, 1).unwrap();
        let up = classify(&tiny, GridSize::new(5, 3), &options, &palette);
        assert!(up.colors().iter().all(|&t| t == Tone::Accent));

        let dark = ImageSample::solid(Srgb::BLACK, 3, 3).unwrap();
        let down = classify(&dark, GridSize::new(1, 1), &options, &palette);
        assert_eq!(down.state(0), CellState::Fixed(Tone::Dark));
    }

    // ========================================================================
    // Animation invariants
    // ========================================================================

    /// If this breaks, it means: static mode started mutating the buffer,
    /// which would make the "no animation" setting flicker.
    #[test]
    fn test_static_mode_never_changes_cells() {
        let mut engine = DitherEngine::new(Palette::default())
            .algorithm(Algorithm::Static)
            .seed(5)
            .load(&varied_sample(), GridSize::new(16, 8));
        let initial = engine.frame().to_vec();
        for _ in 0..100 {
            assert_eq!(engine.next_frame(), initial.as_slice());
        }
    }

    /// If this breaks, it means: random mode is biased, so a cell's long-run
    /// accent share no longer reflects how close its color is to the accent.
    #[test]
    fn test_random_mode_matches_probability_over_many_frames() {
        let palette = Palette::default();
        let sample = blend_sample(&[0.32, 0.45, 0.5, 0.6, 0.68]);
        let mut cells = classify(&sample, GridSize::new(5, 1), &ResampleOptions::new(), &palette);
        assert_eq!(cells.ambiguous_indices().len(), 5);

        let frames = 10_000;
        let mut animator = Animator::seeded(Algorithm::Random, AnimationOptions::new(), 0xD17E);
        let mut accent_counts = [0usize; 5];
        for _ in 0..frames {
            animator.step(&mut cells);
            for (idx, count) in accent_counts.iter_mut().enumerate() {
                if cells.color(idx) == Tone::Accent {
                    *count += 1;
                }
            }
        }

        for (idx, &count) in accent_counts.iter().enumerate() {
            let observed = count as f32 / frames as f32;
            let expected = cells.probability(idx);
            assert!(
                (observed - expected).abs() < 0.05,
                "cell {}: observed accent share {:.3}, expected {:.3}",
                idx,
                observed,
                expected
            );
        }
    }

    /// If this breaks, it means: wave mode with chaos 0 consumes randomness,
    /// so two runs at the same time show different frames.
    #[test]
    fn test_wave_without_chaos_is_deterministic() {
        let load = |seed| {
            DitherEngine::new(Palette::default())
                .algorithm(Algorithm::Wave)
                .chaos(0)
                .seed(seed)
                .load(&varied_sample(), GridSize::new(16, 8))
        };
        let mut a = load(1);
        let mut b = load(2);
        for _ in 0..30 {
            assert_eq!(a.next_frame(), b.next_frame());
        }
    }

    /// If this breaks, it means: the per-row wave cache is stale across
    /// frames, so the wave stops travelling when every ambiguous cell sits
    /// in the same row.
    #[test]
    fn test_wave_moves_with_single_ambiguous_row() {
        let palette = Palette::default();
        let sample = blend_sample(&[0.5; 8]);
        let mut cells = classify(&sample, GridSize::new(8, 1), &ResampleOptions::new(), &palette);
        let mut animator = Animator::seeded(Algorithm::Wave, AnimationOptions::new().chaos(0), 0);

        let mut frames = Vec::new();
        for _ in 0..200 {
            animator.step(&mut cells);
            frames.push(cells.rgba().to_vec());
        }
        frames.dedup();
        assert!(frames.len() > 1, "wave never changed the row");
    }

    // ========================================================================
    // End to end
    // ========================================================================

    /// If this breaks, it means: the wave formula or its row terms changed.
    /// A mid-point image on a 4x4 grid with chaos 0 must render exactly
    /// `p + (x * 2/4 - 1 - sin(y * 0.8)) * 0.3 > 0.5` on the first frame.
    #[test]
    fn test_midpoint_wave_first_frame() {
        let palette = Palette::default();
        let mid = palette.dark().lerp(palette.accent(), 0.5);
        let sample = ImageSample::solid(mid, 4, 4).unwrap();

        let mut engine = DitherEngine::new(palette)
            .algorithm(Algorithm::Wave)
            .threshold(0)
            .chaos(0)
            .seed(11)
            .load(&sample, GridSize::new(4, 4));

        let stats = engine.stats();
        assert_eq!(stats.ambiguous, 16);
        for idx in 0..16 {
            assert!((engine.cells().probability(idx) - 0.5).abs() < 1e-3);
        }

        engine.next_frame();
        let cells = engine.cells();
        for y in 0..4 {
            let sine = (y as f32 * 0.8 - 0.0 * 2.0).sin();
            for x in 0..4 {
                let idx = y * 4 + x;
                let p = cells.probability(idx);
                let threshold = p + (x as f32 * (2.0 / 4.0) - 1.0 - sine) * 0.3;
                assert_eq!(
                    cells.color(idx),
                    Tone::from_accent(threshold > 0.5),
                    "cell ({}, {})",
                    x,
                    y
                );
            }

            // within a row the accent cells form a suffix
            let row: Vec<Tone> = (0..4).map(|x| cells.color(y * 4 + x)).collect();
            let first_accent = row.iter().position(|&t| t == Tone::Accent).unwrap_or(4);
            assert!(row[first_accent..].iter().all(|&t| t == Tone::Accent));
        }
        assert!((engine.animator().time() - 0.016).abs() < 1e-6);
    }

    /// If this breaks, it means: the grid buffer and the cell colors went out
    /// of sync after animation.
    #[test]
    fn test_rgba_mirrors_colors_after_animation() {
        let palette = Palette::default();
        let mut engine = DitherEngine::new(palette.clone())
            .algorithm(Algorithm::Random)
            .seed(3)
            .load(&varied_sample(), GridSize::new(16, 8));
        for _ in 0..10 {
            engine.next_frame();
        }
        let cells = engine.cells();
        for (idx, px) in cells.rgba().chunks(4).enumerate() {
            assert_eq!(px, palette.rgba(cells.color(idx)));
        }
    }
}
