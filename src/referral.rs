//! Referral detection in WHOIS response bodies.

/// Markers that precede a referred server name, in order of preference.
///
/// Registrar referrals come from thick/thin domain registries; `whois:` is the
/// IANA-style field used for TLD and address-block records.
pub const REFERRAL_TOKENS: [&str; 2] = ["Registrar WHOIS Server: ", "whois: "];

/// Returns the server named by the first matching referral token.
///
/// Tokens are tried in [`REFERRAL_TOKENS`] order and only the first
/// occurrence of the winning token is used. The name runs to the next line
/// break (or the end of the body) and is trimmed. An empty name counts as no
/// referral.
///
/// ```
/// use whois_resolver::referral::find_referral;
///
/// let body = "Registrar WHOIS Server: whois.example.net\nOther: x";
/// assert_eq!(find_referral(body), Some("whois.example.net"));
/// assert_eq!(find_referral("no referral here"), None);
/// ```
#[must_use]
pub fn find_referral(body: &str) -> Option<&str> {
    let rest = REFERRAL_TOKENS
        .iter()
        .find_map(|token| body.find(token).map(|start| &body[start + token.len()..]))?;
    let line = rest.split('\n').next().unwrap_or(rest);
    let server = line.trim();
    (!server.is_empty()).then_some(server)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrar_token_stops_at_line_break() {
        let body = "Domain: example.com\nRegistrar WHOIS Server: whois.example.net\nOther: x";
        assert_eq!(find_referral(body), Some("whois.example.net"));
    }

    #[test]
    fn registrar_token_wins_over_whois_token() {
        let body = "whois: whois.first.net\nRegistrar WHOIS Server: whois.second.net\n";
        assert_eq!(find_referral(body), Some("whois.second.net"));
    }

    #[test]
    fn whois_token_from_iana_record() {
        let body = "domain:       COM\n\nwhois:        whois.verisign-grs.com\n\nstatus: ACTIVE\n";
        assert_eq!(find_referral(body), Some("whois.verisign-grs.com"));
    }

    #[test]
    fn first_occurrence_only() {
        let body = "whois: a.example\nwhois: b.example\n";
        assert_eq!(find_referral(body), Some("a.example"));
    }

    #[test]
    fn crlf_and_missing_trailing_newline() {
        assert_eq!(
            find_referral("Registrar WHOIS Server: whois.example.net\r\n"),
            Some("whois.example.net")
        );
        assert_eq!(find_referral("whois: whois.tail.net"), Some("whois.tail.net"));
    }

    #[test]
    fn no_token_or_blank_value() {
        assert_eq!(find_referral("Domain Name: EXAMPLE.COM\n"), None);
        assert_eq!(find_referral("whois:    \nstatus: x\n"), None);
        // Token matching is case-sensitive.
        assert_eq!(find_referral("WHOIS: whois.example.net\n"), None);
    }
}
