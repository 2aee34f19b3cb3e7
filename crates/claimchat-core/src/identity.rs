//! Display handles for new sessions.

use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "amber", "anchor", "autumn", "badger", "bright", "cactus", "canyon", "cedar", "cobalt",
    "comet", "copper", "coral", "dawn", "delta", "ember", "falcon", "fern", "flint", "forest",
    "frost", "garnet", "glacier", "harbor", "hazel", "heron", "island", "ivory", "jasper",
    "juniper", "lagoon", "lantern", "lunar", "maple", "meadow", "mist", "nimbus", "oak",
    "orbit", "otter", "pebble", "pine", "quartz", "raven", "ridge", "river", "saffron",
    "shadow", "sierra", "spruce", "summit", "thistle", "thunder", "tundra", "velvet", "willow",
    "winter", "zephyr",
];

/// Two random words joined with no separator, e.g. `"copperheron"`.
pub fn random_author<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = WORDS.choose(rng).copied().unwrap_or("anon");
    let second = WORDS.choose(rng).copied().unwrap_or("user");
    format!("{first}{second}")
}
