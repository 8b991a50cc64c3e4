use astm_codec::config::Config;
use astm_codec::fragment::{decode_record, encode_record};
use astm_schema::Delimiters;

use astm_lis2a2::{Manufacturer, Message, Patient, Sex};

fn wire(lines: &[&str]) -> Vec<u8> {
    lines.join("\n").into_bytes()
}

#[test]
fn header_and_terminator_round_trip() {
    let cfg = Config::default();
    let bytes = wire(&[
        "H|\\^&|||Bio-Rad|IH v5.2||||||||20220315194227",
        "L|1|N",
    ]);

    let message: Message = astm_codec::decode(&bytes, &cfg).unwrap();
    assert_eq!(message.header.sender.as_deref(), Some("Bio-Rad"));
    assert_eq!(message.header.address.as_deref(), Some("IH v5.2"));
    // cfg.time_zone defaults to Europe/Berlin (spec §8 scenario 1); the wire
    // token is wall-clock time there, CET (UTC+1) in mid-March.
    assert_eq!(
        message.header.date_time.unwrap().to_rfc3339(),
        "2022-03-15T18:42:27+00:00"
    );
    assert!(message.patients.is_empty());
    assert_eq!(message.terminator.termination_code.as_deref(), Some("N"));

    let encoded = astm_codec::encode(&message, &cfg).unwrap();
    assert_eq!(
        String::from_utf8(encoded).unwrap(),
        "H|\\^&|||Bio-Rad|IH v5.2||||||||20220315194227\nL|1|N"
    );
}

#[test]
fn patient_name_splits_on_custom_component_delimiter() {
    let mut cfg = Config::default();
    cfg.delimiters = Delimiters {
        component: b'#',
        ..Delimiters::DEFAULT
    };
    let bytes = wire(&[
        "H|\\#&|||Bio-Rad|IH v5.2||||||||20220315194227",
        "P|1||1010868845||Testus#Test||",
        "L|1|N",
    ]);

    let message: Message = astm_codec::decode(&bytes, &cfg).unwrap();
    assert_eq!(message.patients.len(), 1);
    let patient = &message.patients[0].patient;
    assert_eq!(patient.practice_patient_id.as_deref(), Some("1010868845"));
    assert_eq!(patient.name.last.as_deref(), Some("Testus"));
    assert_eq!(patient.name.first.as_deref(), Some("Test"));

    let encoded = astm_codec::encode(&message, &cfg).unwrap();
    let text = String::from_utf8(encoded).unwrap();
    assert!(text.contains("Testus#Test"));
}

#[test]
fn manufacturer_diluent_array_round_trips_under_short_notation() {
    let mut cfg = Config::default();
    cfg.notation = astm_codec::config::Notation::Short;
    let mut delimiters = Delimiters::DEFAULT;

    let decoded: Manufacturer = decode_record(
        "M|1|REAGENT|DILUENT\\LYSE",
        1,
        &mut delimiters,
        &cfg,
    )
    .unwrap()
    .unwrap();
    assert_eq!(decoded.reagent.as_deref(), Some("REAGENT"));
    assert_eq!(decoded.diluents, vec!["DILUENT".to_string(), "LYSE".to_string()]);

    let line = encode_record(&decoded, 1, &delimiters, &cfg).unwrap();
    assert_eq!(line, "M|1|REAGENT|DILUENT\\LYSE");
}

#[test]
fn patient_sex_round_trips_through_custom_scalar_enum() {
    let cfg = Config::default();
    let mut delimiters = Delimiters::DEFAULT;

    let decoded: Patient = decode_record("P|1||1010868845||Testus^Test|||M", 1, &mut delimiters, &cfg)
        .unwrap()
        .unwrap();
    assert_eq!(decoded.sex, Some(Sex::Male));

    let line = encode_record(&decoded, 1, &delimiters, &cfg).unwrap();
    assert_eq!(line, "P|1||1010868845||Testus^Test|||M");
}

#[test]
fn missing_required_terminator_is_rejected() {
    let cfg = Config::default();
    let bytes = wire(&["H|\\^&|||Bio-Rad|IH v5.2||||||||20220315194227"]);
    let err = astm_codec::decode::<Message>(&bytes, &cfg).unwrap_err();
    assert!(matches!(err, astm_schema::Error::RequiredRecordMissing('L')));
}
