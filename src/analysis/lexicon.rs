//! Curated word tables for the French complexity heuristics.
//!
//! Each rule of the classifier reads one of these tables, so coverage gaps
//! can be audited (and extended) table by table. All entries are lowercase.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Frequent words that are never complex.
pub const COMMON_WORDS: &[&str] = &[
    "alors", "aller", "ainsi", "année", "années", "après", "article", "articles", "assez",
    "aussi", "autre", "autres", "avant", "avec", "avez", "avoir", "avons", "beau", "beaucoup",
    "belle", "besoin", "bien", "bonne", "cela", "celle", "celui", "cette", "ceux", "chaque",
    "chez", "chose", "choses", "client", "clients", "comme", "contenu", "contre", "dans",
    "déjà", "depuis", "dernier", "dernière", "devoir", "dire", "donc", "donner", "elle",
    "elles", "encore", "enfant", "enfants", "entre", "était", "être", "exemple", "facile",
    "faire", "fait", "faut", "femme", "fois", "font", "grand", "grande", "groupe", "histoire",
    "homme", "ici", "idée", "idées", "jamais", "jour", "jours", "lecteur", "lecteurs",
    "lecture", "leur", "leurs", "longtemps", "main", "mais", "maison", "même", "mêmes", "mieux", "moins",
    "monde", "mots", "nous", "nouveau", "nouvelle", "page", "pages", "parce", "parler",
    "part", "partie", "pays", "pendant", "petit", "petite", "peut", "peuvent", "phrase",
    "phrases", "place", "plus", "plusieurs", "point", "pour", "pourquoi", "pouvoir",
    "prendre", "premier", "première", "printemps", "produit", "produits", "puis", "quand", "quelque",
    "raison", "rien", "sans", "savoir", "sera", "service", "services", "simple", "site",
    "sites", "sont", "sous", "temps", "texte", "textes", "toujours", "tous", "tout", "toute",
    "toutes", "travail", "très", "trop", "venir", "vers", "ville", "voir", "vouloir", "vous",
    "vrai", "vraie", "web",
];

/// Common words that end (or start) like technical vocabulary.
pub const COMMON_SUFFIX_WORDS: &[&str] = &[
    "action", "activité", "attention", "comment", "condition", "direction", "document",
    "édition", "également", "élément", "émotion", "fonction", "formation", "identité",
    "information", "liberté", "logement", "mention", "mission", "moment", "nation", "option",
    "passion", "position", "qualité", "question", "réaction", "réalité", "relation",
    "section", "sécurité", "seulement", "situation", "société", "solution", "station",
    "tradition", "version", "vraiment",
];

/// Long words (at or above the long-word threshold) that are always simple.
pub const COMMON_LONG_WORDS: &[&str] = &[
    "aujourd'hui", "application", "applications", "certainement", "communication",
    "complètement", "connaissance", "développement", "différence", "directement",
    "entreprise", "entreprises", "environnement", "évidemment", "expérience",
    "extraordinaire", "facilement", "généralement", "gouvernement", "heureusement",
    "importance", "information", "informations", "intéressant", "intéressante",
    "international", "internationale", "maintenant", "malheureusement", "nécessaire",
    "ordinateur", "organisation", "particulier", "particulière", "population",
    "présentation", "professionnel", "professionnelle", "rapidement", "référencement",
    "restaurant", "simplement", "technologie", "télévision", "université",
];

/// Endings of technical, scientific or abstract vocabulary.
pub const COMPLEX_SUFFIXES: &[&str] = &[
    "isation", "ification", "ologie", "ologique", "ologue", "ographie", "graphique", "nomie",
    "nomique", "métrie", "métrique", "thérapie", "pathie", "pathique", "cratie", "cratique",
    "phobie", "philie", "isme", "escence", "ibilité", "abilité", "ivité", "osité", "atoire",
    "ment",
];

/// Intensifier and scientific prefixes.
pub const COMPLEX_PREFIXES: &[&str] = &[
    "hyper", "hypo", "ultra", "archi", "extra", "infra", "méga", "micro", "macro", "multi",
    "pseudo", "quasi", "anti", "poly", "hétéro",
];

/// A prefix only counts when this many letters follow it.
pub const PREFIX_MIN_REMAINDER: usize = 4;

/// Words ending with a `-ment` suffix at or below this length stay simple.
pub const SHORT_MENT_MAX_LEN: usize = 8;

/// Words matching an affix that are nonetheless common.
pub const SUFFIX_EXCEPTIONS: &[&str] = &[
    "antivirus", "autonomie", "démocratie", "économie", "écologie", "extraordinaire",
    "gastronomie", "géographie", "mécanisme", "multiple", "multiples", "optimisme",
    "organisme", "photographie", "possibilité", "responsabilité", "tourisme",
    "ultraviolet", "visibilité",
];

/// Common words with four or more approximate syllables.
pub const COMMON_POLYSYLLABIC: &[&str] = &[
    "américain", "américaine", "automobile", "éducation", "électricité", "immobilier",
    "nécessaire", "particulier", "possibilité", "télécharger", "télévision", "université",
    "utilisateur", "utilisateurs", "utiliser", "véritable", "visibilité",
];

/// Vowel clusters pronounced as a single syllable.
pub const ONE_SYLLABLE_CLUSTERS: &[&str] = &[
    "ai", "au", "ei", "eu", "ia", "ie", "io", "oi", "ou", "ue", "ui", "œu", "aie", "eau",
    "eui", "ieu", "iai", "oie", "oua", "oue", "oui", "uie",
];

/// Three-vowel runs that occur in ordinary French spelling.
pub const ORDINARY_VOWEL_TRIPLES: &[&str] = &[
    "aie", "aya", "aye", "ayo", "eau", "éée", "eui", "eye", "iai", "iée", "ieu", "oeu", "oie",
    "oua", "oue", "oui", "oya", "oye", "uée", "uei", "uie", "uya", "uye",
];

/// Letters that make a three- or four-consonant run pronounceable
/// (`str`, `mpl`, `sch`, `nst`).
pub const SOFT_CLUSTER_LETTERS: &[char] = &['h', 'l', 'r', 's'];

/// Extra entries of the embedded fallback dictionary.
///
/// The fallback is the union of every table in this module plus these words,
/// so every word curated as common is also a known word.
pub const FALLBACK_EXTRA: &[&str] = &[
    "accompagnement", "administration", "architecture", "association", "bibliothèque",
    "catégorie", "commentaire", "commentaires", "communauté", "concurrence", "conférence",
    "construction", "consommation", "département", "description", "différente",
    "différentes", "différents", "distribution", "documentation", "électronique",
    "événement", "événements", "exactement", "exceptionnel", "explication", "fabrication",
    "fonctionnement", "généralité", "historique", "immédiatement", "indépendant",
    "installation", "instruction", "intelligence", "introduction", "investissement",
    "malheureuse", "newsletter", "numérique", "opportunité", "orientation", "participant",
    "participation", "personnalité", "personnellement", "positionnement", "possibilités",
    "pratiquement", "préparation", "principalement", "probablement", "production",
    "programmation", "progression", "proposition", "protection", "publication",
    "recommandation", "réglementation", "renseignement", "représentation", "réservation",
    "responsable", "signification", "spécialement", "supplémentaire", "traditionnel",
    "transformation", "utilisation", "visibilité",
];

fn set(tables: &[&[&'static str]]) -> HashSet<&'static str> {
    tables.iter().flat_map(|t| t.iter().copied()).collect()
}

static COMMON: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| set(&[COMMON_WORDS, COMMON_SUFFIX_WORDS]));
static LONG: LazyLock<HashSet<&'static str>> = LazyLock::new(|| set(&[COMMON_LONG_WORDS]));
static EXCEPTIONS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| set(&[SUFFIX_EXCEPTIONS]));
static POLYSYLLABIC: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| set(&[COMMON_POLYSYLLABIC]));

/// Check the common-word and common-suffix-word allowlists.
pub fn is_common_word(word: &str) -> bool {
    COMMON.contains(word)
}

pub fn is_common_long_word(word: &str) -> bool {
    LONG.contains(word)
}

pub fn is_affix_exception(word: &str) -> bool {
    EXCEPTIONS.contains(word)
}

pub fn is_common_polysyllabic(word: &str) -> bool {
    POLYSYLLABIC.contains(word)
}

/// Every word of the embedded fallback dictionary.
pub fn fallback_words() -> impl Iterator<Item = &'static str> {
    [
        COMMON_WORDS,
        COMMON_SUFFIX_WORDS,
        COMMON_LONG_WORDS,
        SUFFIX_EXCEPTIONS,
        COMMON_POLYSYLLABIC,
        FALLBACK_EXTRA,
    ]
    .into_iter()
    .flat_map(|t| t.iter().copied())
}
