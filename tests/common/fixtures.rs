// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A transcript long enough to pass document validation and produce one
/// chunk under the video_transcript preset
#[allow(dead_code)] // Used in integration tests
pub const TRANSCRIPT: &str = "The mash rested at sixty five degrees while we recirculated \
the wort slowly. Hops went into the boil kettle in three additions for balance. The yeast \
starter was pitched once the wort had cooled down enough. Fermentation held steady for ten \
days before we checked the gravity. Dry hopping added aroma while the beer conditioned in \
the fermenter. We measured the final gravity and logged the abv for the recipe notes. The \
kegs were cleaned and purged before the transfer began. Carbonation settled after three \
days and the lager tasted crisp.";

/// A second distinct transcript with different fingerprints
#[allow(dead_code)] // Used in integration tests
pub const TRANSCRIPT_ALT: &str = "Sparging rinsed the grain bed while the kettle slowly came \
up to a boil. The wort gravity read higher than expected for this malt bill. A clean ale \
yeast went into the fermenter at eighteen degrees. Lagering will smooth out the rough \
edges over the coming weeks. We added hops late in the boil to keep the bitterness low. \
The mash tun drained clear after the second runoff was collected. Bottles and kegs were \
sanitized while the beer finished conditioning. Final gravity readings confirmed the \
ferment was fully complete.";

/// Exactly six sentences of roughly seventy characters each. Under a
/// 200-character sentence-mode geometry this chunks into exactly three
/// two-sentence chunks.
#[allow(dead_code)] // Used in integration tests
pub const SIX_SENTENCES: &str = "The mash tun held steady while the first runnings drained \
into the kettle. Hops for the bittering addition went into the boil at sixty minutes. The \
yeast starter had been building on the stir plate since early morning. Fermentation kicked \
off within hours and the gravity began dropping fast. Dry hopping happened on day five \
while the ale was still active. The kegs were purged with carbon dioxide before the beer \
transferred over.";

/// Twelve words, one sentence, no brewing vocabulary. Fails document
/// validation on sentence count and domain relevance.
#[allow(dead_code)] // Used in integration tests
pub const OFF_TOPIC: &str =
    "The committee reviewed the quarterly paperwork before the meeting adjourned for lunch.";

/// Too short for any preset's document floor
#[allow(dead_code)] // Used in integration tests
pub const NOISE: &str = "too short";

/// Transcript with CJK content mixed in
#[allow(dead_code)] // Used in UTF-8 safety tests
pub const CJK_TRANSCRIPT: &str = "The mash schedule 糖化休止 ran for sixty minutes at a steady \
temperature. 麦汁煮沸 the wort boil lasted ninety minutes with two hops additions. The yeast \
酵母 fermented the ale for ten days before we measured the gravity. 低温熟成 lagering will \
continue for another three weeks in the cold room. The kegs were filled once carbonation \
reached the target level for this lager.";

/// Transcript with emoji sprinkled through otherwise normal sentences
#[allow(dead_code)] // Used in UTF-8 safety tests
pub const EMOJI_TRANSCRIPT: &str = "The mash went smoothly today 🍺 and the wort tasted \
sweet. Hops from the new harvest 🌿 went into the boil kettle late. The yeast starter was \
bubbling away 🧪 before we pitched it into the fermenter. Gravity readings 📉 dropped \
steadily for a week while the ale fermented. We filled the kegs 🍻 and logged the abv for \
the recipe notes.";

/// Content roots fixture: one temp dir holding the three watched roots
/// (`transcripts/`, `ocr/`, `manuals/`)
pub struct ContentRoots {
    pub dir: TempDir,
}

impl ContentRoots {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the fixture tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file under a watched root, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Remove a previously written file
    #[allow(dead_code)] // Used in integration tests
    pub fn remove(&self, relative: &str) {
        std::fs::remove_file(self.dir.path().join(relative)).unwrap();
    }
}

impl Default for ContentRoots {
    fn default() -> Self {
        Self::new()
    }
}
