/// Checks if a hostname matches a shell-style glob pattern
///
/// Two wildcards are supported:
/// 1. `*` matches any run of characters, including none
/// 2. `?` matches exactly one character
///
/// Any other character matches itself. A pattern without wildcards is an
/// exact match, so `"example.com"` admits only `"example.com"` while
/// `"*.example.com"` admits any subdomain (but not the bare domain, which
/// lacks the literal dot).
///
/// # Arguments
///
/// * `pattern` - The glob pattern, e.g. `"*.example.com"`
/// * `candidate` - The hostname to check against the pattern
///
/// # Returns
///
/// * `true` - If the candidate matches the pattern
/// * `false` - Otherwise
///
/// # Examples
///
/// ```
/// use spinneret::url::matches_glob;
///
/// // Exact match
/// assert!(matches_glob("example.com", "example.com"));
/// assert!(!matches_glob("example.com", "other.com"));
///
/// // Glob match
/// assert!(matches_glob("*.example.com", "blog.example.com"));
/// assert!(matches_glob("*.example.com", "api.v2.example.com"));
/// assert!(!matches_glob("*.example.com", "example.org"));
/// ```
pub fn matches_glob(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let mut p = 0;
    let mut c = 0;
    // Position to resume from when a literal run after a '*' fails.
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == candidate[c]) {
            p += 1;
            c += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p + 1, c));
            p += 1;
        } else if let Some((star_p, star_c)) = backtrack {
            // Let the previous '*' swallow one more character and retry.
            p = star_p;
            c = star_c + 1;
            backtrack = Some((star_p, star_c + 1));
        } else {
            return false;
        }
    }

    // Trailing '*'s match the empty remainder.
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}
