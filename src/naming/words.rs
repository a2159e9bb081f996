//! Word lists for release names. Entries are lowercase ASCII without hyphens.

/// First half of a release name
pub const ADJECTIVES: &[&str] = &[
    "agile", "amber", "ancient", "arctic", "bold", "brave", "brisk", "bright", "calm", "clever",
    "cosmic", "crimson", "curious", "daring", "dapper", "eager", "electric", "emerald", "fearless",
    "fierce", "gentle", "gilded", "golden", "grand", "happy", "hidden", "humble", "icy", "jolly",
    "keen", "kind", "lively", "lucky", "lunar", "mellow", "mighty", "misty", "nimble", "noble",
    "polar", "proud", "quick", "quiet", "radiant", "rapid", "restless", "rustic", "silent",
    "silver", "sleek", "solar", "spry", "steady", "stellar", "stormy", "sturdy", "swift", "tidy",
    "valiant", "vivid", "wandering", "wild", "wise", "witty", "zesty",
];

/// Second half of a release name
pub const ANIMALS: &[&str] = &[
    "albatross", "antelope", "badger", "beaver", "bison", "bobcat", "caribou", "cheetah", "condor",
    "coyote", "crane", "dolphin", "eagle", "egret", "falcon", "ferret", "finch", "fox", "gazelle",
    "gecko", "heron", "ibex", "jackal", "jaguar", "kestrel", "koala", "lemur", "leopard", "lynx",
    "magpie", "marmot", "marten", "meerkat", "moose", "narwhal", "ocelot", "orca", "osprey",
    "otter", "owl", "panther", "pelican", "penguin", "puffin", "quokka", "raven", "salmon",
    "seal", "sparrow", "stallion", "swan", "tapir", "tiger", "toucan", "walrus", "weasel",
    "wolf", "wombat", "yak", "zebra",
];
