//! Canonical book name to chapter-provider book id mapping.

use std::collections::BTreeMap;

const CANON: [&str; 66] = [
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Book name lookup table. Names match case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookTable {
    ids: BTreeMap<String, u32>,
}

impl BookTable {
    /// 66-book canon, Genesis = 1 through Revelation = 66.
    pub fn standard() -> Self {
        let mut table = Self::default();
        for (index, name) in CANON.iter().enumerate() {
            table.insert(name, index as u32 + 1);
        }
        table.insert("Psalm", 19);
        table.insert("Song of Songs", 22);
        table
    }

    pub fn insert(&mut self, name: &str, id: u32) {
        self.ids.insert(normalize_name(name), id);
    }

    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.ids.get(&normalize_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
