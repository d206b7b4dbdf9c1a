//! Static keyword lists for the educational-content filter.
//!
//! Matching is a case-insensitive substring test against title and
//! description, so every entry here must be lowercase.

pub const EDUCATIONAL: &[&str] = &[
    "how to",
    "tutorial",
    "step by step",
    "beginner guide",
    "for beginners",
    "training",
    "learn",
    "lesson",
    "basics",
    "intro",
    "introduction",
    "techniques",
    "tips and tricks",
    "practice",
    "walkthrough",
    "instruction",
    "demonstration",
    "guide",
    "masterclass",
    "beginner tutorial",
    "quick start",
    "improve skills",
    "essential skills",
    "fundamentals",
    "start here",
    "best way to learn",
    "easy method",
    "simple method",
    "explained",
    "in depth",
    "stepwise",
    "hands on",
    "real example",
    "example based",
    "detailed tutorial",
    "expert tips",
    "complete guide",
    "full course",
    "training session",
    "learning session",
    "how it works",
    "how to do",
    "practice drill",
    "technique drill",
    "beginner exercises",
    "advanced techniques",
    "problem solving",
    "common mistakes",
    "avoid mistakes",
    "skill development",
    "professional guide",
    "beginner friendly",
    "quicker learning",
];

pub const EXCLUDED: &[&str] = &[
    "funny",
    "prank",
    "meme",
    "music",
    "song",
    "dance",
    "entertainment",
    "comedy",
    "reaction",
];
