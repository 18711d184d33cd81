mod common;
use common::*;

use sunspec_bridge::error::{SunSpecError, TransportError};
use sunspec_bridge::sunspec::scanner::{scan_model_addresses, ModelAddress, SUNSPEC_BASE_ADDRESS};

#[tokio::test]
async fn test_scan_model_addresses() -> Result<()> {
    common_setup();

    let models = vec![common_words(), inverter_int_words(), settings_words()];
    let transport = MockTransport::with_models(&models);

    let table = scan_model_addresses(&transport, 1, 64).await?;

    assert_eq!(table.len(), 3);
    assert_eq!(table.ids().collect::<Vec<_>>(), vec![1, 103, 121]);
    assert_eq!(
        table.get(1),
        Some(ModelAddress {
            start: 40002,
            length: 68
        })
    );
    assert_eq!(
        table.get(103),
        Some(ModelAddress {
            start: 40070,
            length: 52
        })
    );
    assert_eq!(
        table.get(121),
        Some(ModelAddress {
            start: 40122,
            length: 32
        })
    );
    assert_eq!(table.get(120), None);

    assert_eq!(transport.connects(), 1);
    // signature, three headers and the end marker
    assert_eq!(
        transport.reads(),
        vec![(40000, 2), (40002, 2), (40070, 2), (40122, 2), (40154, 2)]
    );

    Ok(())
}

#[tokio::test]
async fn test_scan_empty_chain() -> Result<()> {
    common_setup();

    let transport = MockTransport::with_models(&[]);
    let table = scan_model_addresses(&transport, 1, 64).await?;

    assert!(table.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_scan_first_of_uses_candidate_order() -> Result<()> {
    common_setup();

    let models = vec![
        common_words(),
        blank_model(211, 124),
        blank_model(201, 105),
    ];
    let transport = MockTransport::with_models(&models);
    let table = scan_model_addresses(&transport, 1, 64).await?;

    let (id, address) = table.first_of(&[204, 203, 202, 201, 211]).unwrap();
    assert_eq!(id, 201);
    assert_eq!(address.start, model_start(&models, 2));
    assert_eq!(table.first_of(&[101, 102, 103]), None);

    Ok(())
}

#[tokio::test]
async fn test_scan_rejects_bad_signature() -> Result<()> {
    common_setup();

    let transport = MockTransport::new();
    transport.load(SUNSPEC_BASE_ADDRESS, &[0x1234, 0x5678, 0xFFFF, 0]);

    let result = scan_model_addresses(&transport, 1, 64).await;
    assert_eq!(result, Err(SunSpecError::SignatureMismatch(0x12345678)));

    // the chain is never walked
    assert_eq!(transport.reads().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_scan_without_sunspec_map() -> Result<()> {
    common_setup();

    let transport = MockTransport::new();
    let result = scan_model_addresses(&transport, 1, 64).await;

    assert!(matches!(
        result,
        Err(SunSpecError::Transport(TransportError::Exception(_)))
    ));

    Ok(())
}

#[tokio::test]
async fn test_scan_stops_at_max_models() -> Result<()> {
    common_setup();

    // three models and no end marker
    let transport = MockTransport::new();
    let mut words = vec![0x5375, 0x6e53];
    words.extend(common_words());
    words.extend(inverter_int_words());
    words.extend(settings_words());
    transport.load(SUNSPEC_BASE_ADDRESS, &words);

    let result = scan_model_addresses(&transport, 1, 2).await;
    assert!(matches!(result, Err(SunSpecError::MalformedModelChain(_))));

    // signature plus max_models + 1 headers
    assert_eq!(transport.reads().len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_scan_exactly_max_models() -> Result<()> {
    common_setup();

    let models = vec![common_words(), inverter_int_words(), settings_words()];
    let transport = MockTransport::with_models(&models);

    let table = scan_model_addresses(&transport, 1, 3).await?;
    assert_eq!(table.len(), 3);

    Ok(())
}

#[tokio::test]
async fn test_scan_rejects_chain_past_register_space() -> Result<()> {
    common_setup();

    let transport = MockTransport::new();
    transport.load(SUNSPEC_BASE_ADDRESS, &[0x5375, 0x6e53, 1, 40000]);

    let result = scan_model_addresses(&transport, 1, 64).await;
    assert!(matches!(result, Err(SunSpecError::MalformedModelChain(_))));

    Ok(())
}
