//! Tests for DNA string encoding, splitting and hashing

#[cfg(test)]
mod tests {
    use collagen::dna::token::{Dna, DnaToken, RawToken, parse_token, split_tokens};

    fn token(slot: usize, id: usize, filename: &str, bypass: bool) -> DnaToken {
        DnaToken {
            slot,
            kind: format!("Layer{slot}"),
            element_id: id,
            filename: filename.to_string(),
            bypass,
        }
    }

    fn sample() -> Dna {
        Dna {
            tokens: vec![
                token(0, 2, "Red#10.png", false),
                token(1, 0, "Round-Eyes.png", false),
                token(2, 5, "Sparkle.png", true),
            ],
        }
    }

    // Tests full and normalized string forms
    // Verified by keeping bypass tokens in the normalized form
    #[test]
    fn test_encode_and_normalize() {
        let dna = sample();
        assert_eq!(
            dna.encode(),
            "2:Red#10.png-0:Round-Eyes.png-5:Sparkle.png?bypassDNA=true"
        );
        assert_eq!(dna.normalized(), "2:Red#10.png-0:Round-Eyes.png");
        assert_eq!(dna.to_string(), dna.encode());
    }

    // Tests splitting only at token boundaries
    // Verified by splitting at every delimiter
    #[test]
    fn test_split_tokens_keeps_hyphenated_names() {
        let encoded = sample().encode();
        assert_eq!(
            split_tokens(&encoded),
            vec!["2:Red#10.png", "0:Round-Eyes.png", "5:Sparkle.png?bypassDNA=true"]
        );
        assert!(split_tokens("").is_empty());
        assert_eq!(split_tokens("1:a-b-2x.png"), vec!["1:a-b-2x.png"]);
    }

    // Tests token parsing with and without query
    // Verified by ignoring the query string
    #[test]
    fn test_parse_token() {
        assert_eq!(
            parse_token("3:Hat.png?bypassDNA=true"),
            Some(RawToken {
                element_id: 3,
                filename: "Hat.png".to_string(),
                bypass: true,
            })
        );
        assert_eq!(
            parse_token("12:My:Hat.png").map(|t| t.filename),
            Some("My:Hat.png".to_string())
        );
        assert_eq!(parse_token("Hat.png"), None);
        assert_eq!(parse_token("x:Hat.png"), None);
    }

    // Tests encoding then parsing recovers every token
    // Verified by dropping the bypass suffix on encode
    #[test]
    fn test_string_form_recovers_tokens() {
        let dna = sample();
        let encoded = dna.encode();
        let parsed: Vec<_> = split_tokens(&encoded)
            .into_iter()
            .filter_map(parse_token)
            .collect();
        assert_eq!(parsed.len(), dna.len());
        for (raw, original) in parsed.iter().zip(&dna.tokens) {
            assert_eq!(raw.element_id, original.element_id);
            assert_eq!(raw.filename, original.filename);
            assert_eq!(raw.bypass, original.bypass);
        }
    }

    // Tests hash format and sensitivity
    // Verified by hashing the normalized form
    #[test]
    fn test_hash() {
        let dna = sample();
        let hash = dna.hash();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, sample().hash());

        let mut changed = sample();
        changed.tokens[2].bypass = false;
        assert_ne!(changed.hash(), hash);
        assert_eq!(
            Dna::new().hash(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    // Tests slot lookup
    // Verified by looking up by position
    #[test]
    fn test_token_for_slot() {
        let mut dna = sample();
        dna.tokens.remove(1);
        assert_eq!(dna.token_for_slot(2).map(|t| t.element_id), Some(5));
        assert!(dna.token_for_slot(1).is_none());
        assert!(!dna.is_empty());
    }
}
