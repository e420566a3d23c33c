//! WCAG contrast repair.
//!
//! Repairs a foreground color against its background until a minimum
//! contrast ratio is met, by stepping the foreground's lightness in fixed
//! 2-point increments. The adjustment direction is picked once up front
//! from relative luminance and never reverses, and the loop is bounded by
//! the configured iteration budget. The result is best-effort: callers
//! must not assume the target ratio was reached.
//!
//! Malformed colors carry NaN components; every ratio comparison against
//! NaN is false, so repair walks its full budget without effect and
//! returns the NaN-carrying input. That soft-failure mode is deliberate
//! (see the config validation that keeps it out of production themes).

use crate::color::{Hsl, contrast_ratio};
use crate::constants::CONTRAST_REPAIR_STEP;
use crate::prefs::AccessibilityOptions;
use crate::tokens::TokenSet;

/// Repair `foreground` against `background` to meet the minimum ratio.
///
/// Returns the foreground unchanged when the ratio is already met.
/// Otherwise steps lightness darker when the foreground's luminance is
/// below the background's, lighter when above, clamped to `[0, 100]` each
/// step, for at most `max_iterations` steps.
pub fn ensure_pair_contrast(
    background: &Hsl,
    foreground: &Hsl,
    options: &AccessibilityOptions,
) -> Hsl {
    let mut current = *foreground;
    if contrast_ratio(&current, background) >= options.minimum_ratio {
        return current;
    }

    // Direction is fixed before the first step and never reverses, even
    // if a step overshoots the target.
    let move_darker = foreground.relative_luminance() < background.relative_luminance();
    let step = if move_darker {
        -CONTRAST_REPAIR_STEP
    } else {
        CONTRAST_REPAIR_STEP
    };

    for _ in 0..options.max_iterations {
        current = current.with_lightness_delta(step);
        if contrast_ratio(&current, background) >= options.minimum_ratio {
            return current;
        }
    }

    current
}

/// Repair the five fixed background/foreground pairs of a token set.
///
/// Each pair is adjusted independently; there is no cross-pair coupling.
pub fn ensure_contrast(tokens: &TokenSet, options: &AccessibilityOptions) -> TokenSet {
    TokenSet {
        foreground: ensure_pair_contrast(&tokens.background, &tokens.foreground, options),
        muted_foreground: ensure_pair_contrast(&tokens.muted, &tokens.muted_foreground, options),
        card_foreground: ensure_pair_contrast(&tokens.card, &tokens.card_foreground, options),
        accent_foreground: ensure_pair_contrast(&tokens.accent, &tokens.accent_foreground, options),
        destructive_foreground: ensure_pair_contrast(
            &tokens.destructive,
            &tokens.destructive_foreground,
            options,
        ),
        ..*tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Phase;

    fn options(minimum_ratio: f64, max_iterations: u32) -> AccessibilityOptions {
        AccessibilityOptions {
            minimum_ratio,
            max_iterations,
            ..Default::default()
        }
    }

    #[test]
    fn sufficient_contrast_returns_foreground_unchanged() {
        let background = Hsl::parse("0 0% 100%");
        let foreground = Hsl::parse("0 0% 10%");
        let repaired = ensure_pair_contrast(&background, &foreground, &options(4.5, 24));
        assert_eq!(repaired, foreground);
    }

    #[test]
    fn near_white_foreground_is_pushed_darker() {
        let background = Hsl::parse("0 0% 100%");
        let foreground = Hsl::parse("0 0% 90%");
        let repaired = ensure_pair_contrast(&background, &foreground, &options(4.5, 24));
        assert!(contrast_ratio(&repaired, &background) >= 4.5);
        // White background outshines the foreground, so repair moves darker
        assert!(repaired.lightness < foreground.lightness);
    }

    #[test]
    fn dark_background_pushes_foreground_lighter() {
        let background = Hsl::parse("230 22% 10%");
        let foreground = Hsl::parse("230 22% 20%");
        let repaired = ensure_pair_contrast(&background, &foreground, &options(4.5, 48));
        assert!(contrast_ratio(&repaired, &background) >= 4.5);
        assert!(repaired.lightness > foreground.lightness);
    }

    #[test]
    fn repair_never_exceeds_step_times_budget() {
        let background = Hsl::parse("0 0% 100%");
        let foreground = Hsl::parse("0 0% 90%");
        let opts = options(4.5, 24);
        let repaired = ensure_pair_contrast(&background, &foreground, &opts);
        let moved = (foreground.lightness - repaired.lightness) * 100.0;
        assert!(moved > 0.0);
        assert!(moved <= CONTRAST_REPAIR_STEP * opts.max_iterations as f64 + 1e-9);
    }

    #[test]
    fn exhausted_budget_returns_best_effort() {
        // Two iterations cannot bridge white-on-near-white to 4.5
        let background = Hsl::parse("0 0% 100%");
        let foreground = Hsl::parse("0 0% 95%");
        let repaired = ensure_pair_contrast(&background, &foreground, &options(4.5, 2));
        assert!(contrast_ratio(&repaired, &background) < 4.5);
        // But the budget was spent moving in the committed direction
        assert!((repaired.lightness - 0.91).abs() < 1e-9);
    }

    #[test]
    fn malformed_foreground_soft_fails() {
        let background = Hsl::parse("0 0% 100%");
        let foreground = Hsl::parse("broken");
        let repaired = ensure_pair_contrast(&background, &foreground, &options(4.5, 24));
        assert!(repaired.lightness.is_nan());
    }

    #[test]
    fn token_set_repair_touches_only_foreground_slots() {
        let mut tokens = TokenSet::defaults(Phase::Day);
        tokens.foreground = Hsl::parse("0 0% 90%");
        let repaired = ensure_contrast(&tokens, &options(4.5, 24));
        assert!(contrast_ratio(&repaired.foreground, &repaired.background) >= 4.5);
        assert_eq!(repaired.background, tokens.background);
        assert_eq!(repaired.muted, tokens.muted);
        assert_eq!(repaired.border, tokens.border);
    }

    #[test]
    fn all_five_pairs_meet_ratio_for_default_phases() {
        let opts = options(4.5, 24);
        for phase in Phase::ORDER {
            let repaired = ensure_contrast(&TokenSet::defaults(phase), &opts);
            for (bg, fg) in [
                (&repaired.background, &repaired.foreground),
                (&repaired.muted, &repaired.muted_foreground),
                (&repaired.card, &repaired.card_foreground),
                (&repaired.accent, &repaired.accent_foreground),
                (&repaired.destructive, &repaired.destructive_foreground),
            ] {
                let ratio = contrast_ratio(fg, bg);
                // Budget-bounded: either the ratio is met or the repair
                // walked its full 24-step budget
                let moved = (fg.lightness * 100.0).round();
                assert!(
                    ratio >= 4.5 || moved == 0.0 || moved == 100.0,
                    "{phase}: ratio {ratio} with lightness {moved}"
                );
            }
        }
    }
}
