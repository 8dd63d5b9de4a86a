use super::probe::PlatformInfo;

/// Picks `linux` on Linux-like hosts, `other` everywhere else.
pub fn resolve_command<'a>(platform: PlatformInfo, linux: &'a str, other: &'a str) -> &'a str {
    if platform.is_linux_like {
        linux
    } else {
        other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_picks_first_option() {
        assert_eq!(
            resolve_command(PlatformInfo::linux(), "sensible-browser http://x", "open http://x"),
            "sensible-browser http://x"
        );
    }

    #[test]
    fn other_picks_second_option() {
        assert_eq!(
            resolve_command(PlatformInfo::other(), "sensible-browser http://x", "open http://x"),
            "open http://x"
        );
    }

    #[test]
    fn repeated_calls_agree() {
        let p = PlatformInfo::linux();
        let first = resolve_command(p, "a", "b");
        let second = resolve_command(p, "a", "b");
        assert_eq!(first, second);
    }

    #[test]
    fn fallback_picks_second_option() {
        assert_eq!(resolve_command(PlatformInfo::FALLBACK, "a", "b"), "b");
    }
}
