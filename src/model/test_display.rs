use super::*;

use pretty_assertions::assert_eq;

#[test]
fn test_display_server_descriptor() {
    assert_eq!(
        "1: 10.0.0.1:61023",
        format!("{}", ServerDescriptor::new(1, vec!["10.0.0.1:61023"]))
    );
    assert_eq!(
        "2: a:1,b:2",
        format!("{}", ServerDescriptor::new(2, vec!["a:1", "b:2"]))
    );
    assert_eq!(
        "3: ",
        format!("{}", ServerDescriptor::new::<String>(3, vec![]))
    );
}

#[test]
fn test_display_configuration() {
    let c = Configuration::new(
        5,
        vec![
            (1, "10.0.0.1:61023").into(),
            ServerDescriptor::new(2, vec!["10.0.0.2:61023", "[::1]:61023"]),
        ],
    );

    assert_eq!(
        "Configuration 5:\n- 1: 10.0.0.1:61023\n- 2: 10.0.0.2:61023,[::1]:61023\n",
        format!("{}", c)
    );

    assert_eq!("Configuration 0:\n", format!("{}", Configuration::default()));
}

#[test]
fn test_display_change_result() {
    assert_eq!("OK", format!("{}", ChangeResult::Ok));
    assert_eq!(
        "CHANGED (epoch is 6)",
        format!(
            "{}",
            ChangeResult::Changed {
                error: "epoch is 6".into()
            }
        )
    );
    assert_eq!(
        "BAD SERVERS (unreachable):\n- 2: 10.0.0.2:61023",
        format!(
            "{}",
            ChangeResult::Bad {
                error: "unreachable".into(),
                bad_servers: vec![(2, "10.0.0.2:61023").into()],
            }
        )
    );
}

#[test]
fn test_display_status() {
    assert_eq!("OK", Status::Ok.to_string());
    assert_eq!("TIMEOUT", Status::Timeout.to_string());
    assert_eq!("OTHER", Status::Other.to_string());
}

#[test]
fn test_configuration_format_then_parse() {
    let cases = vec![
        Configuration::default(),
        Configuration::new(5, vec![(1, "10.0.0.1:61023").into()]),
        Configuration::new(
            u64::MAX,
            vec![
                ServerDescriptor::new(9, vec!["h9:1", "h9:2", "[::1]:3"]),
                ServerDescriptor::new::<String>(3, vec![]),
                ServerDescriptor::new(4, vec!["", "x,y"]),
                (1, "10.0.0.1:61023").into(),
            ],
        ),
    ];

    for c in cases.iter() {
        let text = format!("{}", c);
        let got = parse_configuration(&text).unwrap();
        assert_eq!(c, &got, "text: {}", text);
    }
}

#[test]
fn test_parse_configuration_errors() {
    assert_eq!(
        ParseError::BadHeader("".into()),
        parse_configuration("").unwrap_err()
    );
    assert_eq!(
        ParseError::BadHeader("Config 5:".into()),
        parse_configuration("Config 5:\n").unwrap_err()
    );
    assert_eq!(
        ParseError::BadMember("* 1: a".into()),
        parse_configuration("Configuration 5:\n* 1: a\n").unwrap_err()
    );
    assert_eq!(
        ParseError::BadMember("1 a".into()),
        parse_configuration("Configuration 5:\n- 1 a\n").unwrap_err()
    );

    match parse_configuration("Configuration x:\n").unwrap_err() {
        ParseError::BadNumber(line, _) => assert_eq!("Configuration x:", line),
        e => panic!("unexpected error: {:?}", e),
    }
}

#[test]
fn test_server_descriptor_quoted_addresses() {
    let cases: Vec<(Vec<&str>, &str)> = vec![
        (vec![""], r#"7: """#),
        (vec!["a,b"], r#"7: "a,b""#),
        (vec!["a:1", "", "b:2"], r#"7: a:1,"",b:2"#),
        (vec![" pad "], r#"7: " pad ""#),
        (vec![r#"q"uo\te"#], r#"7: "q\"uo\\te""#),
        (vec![r"back\slash"], r"7: back\slash"),
    ];

    for (addrs, text) in cases {
        let sd = ServerDescriptor::new(7, addrs.clone());
        assert_eq!(text, sd.to_string(), "{:?}", addrs);

        let parsed: ServerDescriptor = text.parse().unwrap();
        assert_eq!(sd, parsed, "{:?}", addrs);
    }
}

#[test]
fn test_server_descriptor_bad_quote() {
    let rst = r#"7: "a,b"#.parse::<ServerDescriptor>();
    assert_eq!(ParseError::BadQuote(r#"7: "a,b"#.into()), rst.unwrap_err());

    let rst = r#"7: "a"b"#.parse::<ServerDescriptor>();
    assert_eq!(ParseError::BadMember(r#"7: "a"b"#.into()), rst.unwrap_err());
}
