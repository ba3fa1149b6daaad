//! Built-in package catalog
//!
//! Every supported package is declared here, grouped by category in priority
//! order. Adding a package means adding an entry to the matching category.

use crate::version::filter::Exclusions;
use crate::version::registry::{Category, Entry, NameMatcher, ResolverRegistry};
use crate::version::strategies::{
    FamilyStrategy, GitTagsStrategy, ListingStrategy, PhraseStrategy, TagApiStrategy,
};

const GNU_PACKAGES: &[&str] = &[
    "bash", "binutils", "coreutils", "gawk", "grep", "make", "sed", "tar", "wget",
];

pub fn builtin_registry() -> ResolverRegistry {
    ResolverRegistry::new(vec![
        github_tags(),
        git_tags(),
        gnu_mirror(),
        mirror_listing(),
        vendor_page(),
        release_family(),
        pending(),
    ])
}

fn github_tags() -> Category {
    let tags = |name: &str, strategy: TagApiStrategy| Entry::new(NameMatcher::exact(name), strategy);

    Category::new(
        "github-tags",
        vec![
            tags("curl", TagApiStrategy::github("curl/curl").marker("curl-").separator('_')),
            tags("fzf", TagApiStrategy::github("junegunn/fzf").marker("v")),
            tags("jq", TagApiStrategy::github("jqlang/jq").marker("jq-")),
            tags("neovim", TagApiStrategy::github("neovim/neovim").marker("v")),
            tags("ripgrep", TagApiStrategy::github("BurntSushi/ripgrep")),
            tags("zstd", TagApiStrategy::github("facebook/zstd").marker("v")),
        ],
    )
}

fn git_tags() -> Category {
    Category::new(
        "git-tags",
        vec![
            Entry::new(
                NameMatcher::exact("busybox"),
                GitTagsStrategy::new("https://git.busybox.net/busybox").separator('_'),
            ),
            Entry::new(
                NameMatcher::exact("git"),
                GitTagsStrategy::new("https://git.kernel.org/pub/scm/git/git.git").marker("v"),
            ),
            Entry::new(
                NameMatcher::exact("musl"),
                GitTagsStrategy::new("https://git.musl-libc.org/git/musl").marker("v"),
            ),
        ],
    )
}

fn gnu_mirror() -> Category {
    let mut entries: Vec<Entry> = GNU_PACKAGES
        .iter()
        .map(|name| Entry::new(NameMatcher::exact(name), ListingStrategy::gnu(name)))
        .collect();

    // GCC publishes one directory per release instead of top-level tarballs
    entries.push(Entry::new(
        NameMatcher::exact("gcc"),
        ListingStrategy::new("https://ftp.gnu.org/gnu/gcc/", "gcc-", "/"),
    ));

    Category::new("gnu-mirror", entries)
}

fn mirror_listing() -> Category {
    Category::new(
        "mirror-listing",
        vec![
            Entry::new(
                NameMatcher::exact("lua"),
                ListingStrategy::new("https://www.lua.org/ftp/", "lua-", ".tar.gz"),
            ),
            Entry::new(
                NameMatcher::exact("nginx"),
                ListingStrategy::new("https://nginx.org/download/", "nginx-", ".tar.gz"),
            ),
            // Odd minor releases are development snapshots
            Entry::new(
                NameMatcher::exact("perl"),
                ListingStrategy::new("https://www.cpan.org/src/5.0/", "perl-", ".tar.gz")
                    .exclude(Exclusions::default().reject(r"^\d+\.\d*[13579]\.")),
            ),
            Entry::new(
                NameMatcher::exact("zlib"),
                ListingStrategy::new("https://zlib.net/", "zlib-", ".tar.gz"),
            ),
        ],
    )
}

fn vendor_page() -> Category {
    Category::new(
        "vendor-page",
        vec![
            Entry::new(
                NameMatcher::exact("cmake"),
                PhraseStrategy::new("https://cmake.org/download/", r"Latest Release \({version}\)"),
            ),
            Entry::new(
                NameMatcher::exact("go"),
                PhraseStrategy::new("https://go.dev/VERSION?m=text", r"^go{version}"),
            ),
            Entry::new(
                NameMatcher::exact("php"),
                PhraseStrategy::new(
                    "https://www.php.net/downloads.php",
                    r"(?s)Current Stable.*?PHP {version}",
                ),
            ),
            Entry::new(
                NameMatcher::exact("rust"),
                PhraseStrategy::new(
                    "https://static.rust-lang.org/dist/channel-rust-stable.toml",
                    r#"\[pkg\.rust\]\s*version = "{version}"#,
                ),
            ),
            Entry::new(
                NameMatcher::exact("sqlite"),
                PhraseStrategy::new(
                    "https://www.sqlite.org/index.html",
                    r"(?s)Latest Release.*?Version {version}",
                ),
            ),
        ],
    )
}

fn release_family() -> Category {
    Category::new(
        "release-family",
        vec![
            Entry::new(
                NameMatcher::family("node", &["18", "20", "22", "23"]),
                FamilyStrategy::new(
                    "https://nodejs.org/dist/",
                    r"latest-v(\d+)\.x/",
                    "https://nodejs.org/dist/latest-v{line}.x/",
                    r"node-v({line}\.\d+\.\d+)\.tar\.xz",
                ),
            ),
            Entry::new(
                NameMatcher::family("postgresql", &["13", "14", "15", "16", "17"]),
                FamilyStrategy::new(
                    "https://ftp.postgresql.org/pub/source/",
                    r#"href="v(\d+)\.\d+/""#,
                    "https://ftp.postgresql.org/pub/source/",
                    r#"href="v({line}\.\d+)/""#,
                ),
            ),
            // Line directories appear with the first alpha; only source
            // tarballs without a pre-release tag count as releases
            Entry::new(
                NameMatcher::family("python", &["3.9", "3.10", "3.11", "3.12", "3.13"]),
                FamilyStrategy::new(
                    "https://www.python.org/ftp/python/",
                    r#"href="(3\.\d+)\.\d+/""#,
                    "https://www.python.org/downloads/source/",
                    r"Python-({line}\.\d+)\.tar\.xz",
                ),
            ),
        ],
    )
}

/// Recognized packages without a resolver yet
fn pending() -> Category {
    Category::new(
        "pending",
        vec![
            Entry::unimplemented("chromium"),
            Entry::unimplemented("firefox"),
            Entry::unimplemented("openjdk"),
        ],
    )
}
