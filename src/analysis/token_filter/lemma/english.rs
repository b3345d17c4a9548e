//! English lemmatizer.
//!
//! Lookup table for irregular and common review verb forms, then nominal
//! plural rules. Verb suffixes (-ed, -ing) are only reduced through the table,
//! so adjectives such as "amazing", "broken" or "disappointed" keep their
//! surface form. Every output is a fixed point: lemmatizing a lemma returns it
//! unchanged.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::Lemmatizer;

/// Stop list of the lemmatizer's language resource. Larger than the first-pass
/// list and independently maintained. Contraction suffixes are omitted because
/// apostrophes never survive to this stage.
const LEMMATIZER_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amount",
    "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "bottom", "but", "by", "ca", "call", "can", "cannot", "could", "did", "do",
    "does", "doing", "done", "down", "due", "during", "each", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "first", "five", "for", "former",
    "formerly", "forty", "four", "from", "front", "full", "further", "get", "give", "go", "had",
    "has", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon",
    "hers", "herself", "him", "himself", "his", "how", "however", "hundred", "i", "if", "in",
    "indeed", "into", "is", "it", "its", "itself", "just", "keep", "last", "latter", "latterly",
    "least", "less", "made", "make", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "quite", "rather", "re", "really", "regarding", "same",
    "say", "see", "seem", "seemed", "seeming", "seems", "serious", "several", "she", "should",
    "show", "side", "since", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "third", "this", "those", "though",
    "three", "through", "throughout", "thru", "thus", "to", "together", "too", "top", "toward",
    "towards", "twelve", "twenty", "two", "under", "unless", "until", "up", "upon", "us", "used",
    "using", "various", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Word forms that the suffix rules get wrong or cannot reach.
const LEMMA_EXCEPTIONS: &[(&str, &str)] = &[
    // be / have / do
    ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"), ("been", "be"), ("being", "be"),
    ("am", "be"), ("has", "have"), ("had", "have"), ("having", "have"), ("does", "do"),
    ("did", "do"), ("done", "do"), ("doing", "do"),
    // irregular verbs
    ("bought", "buy"), ("broke", "break"), ("came", "come"), ("got", "get"), ("gotten", "get"),
    ("gave", "give"), ("given", "give"), ("went", "go"), ("gone", "go"), ("made", "make"),
    ("took", "take"), ("taken", "take"), ("said", "say"), ("saw", "see"), ("seen", "see"),
    ("felt", "feel"), ("found", "find"), ("kept", "keep"), ("left", "leave"), ("lost", "lose"),
    ("paid", "pay"), ("sent", "send"), ("spent", "spend"), ("thought", "think"),
    ("told", "tell"), ("tried", "try"), ("wore", "wear"), ("worn", "wear"), ("wrote", "write"),
    ("written", "write"), ("ran", "run"), ("sold", "sell"), ("stood", "stand"),
    ("understood", "understand"), ("held", "hold"), ("fell", "fall"), ("fallen", "fall"),
    ("ate", "eat"), ("eaten", "eat"), ("chose", "choose"), ("chosen", "choose"),
    ("began", "begin"), ("begun", "begin"), ("knew", "know"), ("known", "know"),
    ("grew", "grow"), ("meant", "mean"), ("built", "build"), ("brought", "bring"),
    ("caught", "catch"), ("taught", "teach"), ("fought", "fight"), ("hung", "hang"),
    ("hid", "hide"), ("hidden", "hide"), ("shook", "shake"), ("tore", "tear"), ("torn", "tear"),
    // regular verb forms common in reviews
    ("loved", "love"), ("loving", "love"), ("liked", "like"), ("hated", "hate"),
    ("worked", "work"), ("working", "work"), ("expected", "expect"), ("expecting", "expect"),
    ("ordered", "order"), ("ordering", "order"), ("returned", "return"),
    ("returning", "return"), ("arrived", "arrive"), ("arriving", "arrive"),
    ("received", "receive"), ("purchased", "purchase"), ("recommended", "recommend"),
    ("charged", "charge"), ("charging", "charge"), ("stopped", "stop"), ("stopping", "stop"),
    ("failed", "fail"), ("needed", "need"), ("wanted", "want"), ("looked", "look"),
    ("looking", "look"), ("fitted", "fit"), ("helped", "help"), ("cracked", "crack"),
    ("installed", "install"), ("delivered", "deliver"), ("started", "start"),
    ("turned", "turn"), ("wasted", "waste"), ("wasting", "waste"), ("shipped", "ship"),
    ("shipping", "ship"), ("replaced", "replace"), ("refunded", "refund"),
    ("enjoyed", "enjoy"), ("buying", "buy"), ("tested", "test"),
    ("lasted", "last"), ("lasting", "last"),
    // nouns
    ("children", "child"), ("men", "man"), ("women", "woman"), ("feet", "foot"),
    ("teeth", "tooth"), ("mice", "mouse"), ("knives", "knife"), ("lives", "life"),
    ("shelves", "shelf"), ("wives", "wife"), ("halves", "half"), ("wolves", "wolf"),
    ("potatoes", "potato"), ("tomatoes", "tomato"), ("heroes", "hero"), ("echoes", "echo"),
    ("cookies", "cookie"), ("movies", "movie"), ("calories", "calorie"), ("aches", "ache"),
    ("headaches", "headache"), ("niches", "niche"), ("caches", "cache"), ("menus", "menu"),
    ("buses", "bus"), ("lenses", "lens"), ("thanks", "thank"), ("gases", "gas"),
    ("focuses", "focus"), ("viruses", "virus"), ("bonuses", "bonus"), ("statuses", "status"),
    ("biases", "bias"), ("canvases", "canvas"), ("atlases", "atlas"),
    // invariant forms the plural rules would damage
    ("news", "news"), ("series", "series"), ("species", "species"), ("lens", "lens"),
    ("canvas", "canvas"), ("christmas", "christmas"), ("chaos", "chaos"), ("ios", "ios"),
    ("atlas", "atlas"),
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| LEMMATIZER_STOP_WORDS.iter().copied().collect());

static EXCEPTIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| LEMMA_EXCEPTIONS.iter().copied().collect());

/// Rule-based English lemmatizer with its own stop list.
#[derive(Clone, Debug, Default)]
pub struct EnglishLemmatizer;

impl EnglishLemmatizer {
    /// Create a new English lemmatizer.
    pub fn new() -> Self {
        EnglishLemmatizer
    }

    /// Number of entries in the lemmatizer's stop list.
    pub fn stop_word_count(&self) -> usize {
        STOP_WORDS.len()
    }

    fn plural_to_singular(word: &str) -> Option<String> {
        // Too short, or endings that are not plural markers.
        if word.chars().count() < 4
            || word.ends_with("ss")
            || word.ends_with("us")
            || word.ends_with("is")
            || word.ends_with("ias")
        {
            return None;
        }

        if let Some(stem) = word.strip_suffix("ies") {
            return Some(if stem.chars().count() > 1 {
                format!("{stem}y")
            } else {
                format!("{stem}ie")
            });
        }

        for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
            if word.ends_with(suffix) {
                return Some(word[..word.len() - 2].to_string());
            }
        }

        word.strip_suffix('s').map(str::to_string)
    }
}

impl Lemmatizer for EnglishLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = EXCEPTIONS.get(word) {
            return (*lemma).to_string();
        }
        if !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }
        Self::plural_to_singular(word).unwrap_or_else(|| word.to_string())
    }

    fn is_stop_word(&self, word: &str) -> bool {
        STOP_WORDS.contains(word)
    }

    fn name(&self) -> &'static str {
        "english"
    }
}
