use rand::Rng;

use crate::error::{WidgetError, WidgetResult};

const MIN_COUNT: u32 = 1;
const MAX_COUNT: u32 = 100;

const LOREM_WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "ut",
    "enim", "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris",
    "nisi", "ut", "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "dolor",
    "in", "reprehenderit", "in", "voluptate", "velit", "esse", "cillum", "dolore", "eu", "fugiat",
    "nulla", "pariatur", "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt",
    "in", "culpa", "qui", "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoremUnit {
    Words,
    Sentences,
    Paragraphs,
}

impl LoremUnit {
    pub fn parse(input: &str) -> WidgetResult<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "words" | "word" => Ok(Self::Words),
            "sentences" | "sentence" => Ok(Self::Sentences),
            "" | "paragraphs" | "paragraph" => Ok(Self::Paragraphs),
            other => Err(WidgetError::unsupported("lorem unit", other)),
        }
    }
}

/// First `count` words of the vocabulary, cycling from the start.
pub fn words(count: usize) -> String {
    LOREM_WORDS
        .iter()
        .cycle()
        .take(count)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let body = words(rng.random_range(5..15));
    let mut chars = body.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

pub fn sentences<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| sentence(rng))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn paragraphs<R: Rng + ?Sized>(rng: &mut R, count: usize) -> String {
    (0..count)
        .map(|_| {
            let sentence_count = rng.random_range(2..5);
            sentences(rng, sentence_count)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn generate_lorem_internal<R: Rng + ?Sized>(
    rng: &mut R,
    unit: &str,
    count: u32,
) -> WidgetResult<String> {
    let unit = LoremUnit::parse(unit)?;
    let count = count.clamp(MIN_COUNT, MAX_COUNT) as usize;
    let text = match unit {
        LoremUnit::Words => words(count),
        LoremUnit::Sentences => sentences(rng, count),
        LoremUnit::Paragraphs => paragraphs(rng, count),
    };
    log::debug!("lorem {unit:?} x{count}: {} chars", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn vocabulary_has_sixty_nine_words() {
        assert_eq!(LOREM_WORDS.len(), 69);
    }

    #[test]
    fn words_cycle_through_vocabulary() {
        assert_eq!(words(3), "lorem ipsum dolor");
        let long = words(70);
        assert!(long.ends_with("laborum lorem"));
    }

    #[test]
    fn sentences_are_capitalised_and_sized() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let s = sentence(&mut rng);
            assert!(s.starts_with("Lorem ipsum dolor sit amet"), "{s}");
            assert!(s.ends_with('.'));
            let count = s.split(' ').count();
            assert!((5..=14).contains(&count), "{count} words in {s}");
        }
    }

    #[test]
    fn paragraphs_are_blank_line_separated() {
        let mut rng = StdRng::seed_from_u64(42);
        let text = generate_lorem_internal(&mut rng, "paragraphs", 3).unwrap();
        let paragraphs: Vec<_> = text.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 3);
        for p in paragraphs {
            let sentences = p.matches('.').count();
            assert!((2..=4).contains(&sentences), "{sentences} sentences");
        }
    }

    #[test]
    fn count_is_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = generate_lorem_internal(&mut rng, "words", 0).unwrap();
        assert_eq!(text, "lorem");
        let text = generate_lorem_internal(&mut rng, "words", 500).unwrap();
        assert_eq!(text.split(' ').count(), 100);
        assert!(generate_lorem_internal(&mut rng, "chapters", 1).is_err());
    }
}
