use rand::seq::IteratorRandom;
use rand::Rng;

use crate::models::{catalog::all_categories, PromptOptions};

/// Picks one real option per category, uniformly and independently.
/// The current supplementary text carries over; every other selection is
/// replaced.
pub fn lucky_choice<R: Rng + ?Sized>(rng: &mut R, current: &PromptOptions) -> PromptOptions {
    let mut options = PromptOptions::new();
    for category in all_categories() {
        if let Some(choice) = category.selectable().choose(rng) {
            options.set(category.id, choice.value);
        }
    }
    options.supplementary = current.supplementary.clone();
    options
}
