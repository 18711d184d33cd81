mod common;
use common::*;

use std::sync::Arc;
use std::time::Duration;

use sunspec_bridge::error::{SunSpecError, TransportError};
use sunspec_bridge::sunspec::models::controls::{ConnectControl, Enable};
use sunspec_bridge::sunspec::models::mppt::ModuleState;
use sunspec_bridge::sunspec::models::{InverterModel, MeterModel};
use sunspec_bridge::sunspec::{ConnectionOptions, ModelRecord};

fn connection(transport: &Arc<MockTransport>) -> SunSpecConnection {
    SunSpecConnection::new(transport.clone(), 1, ConnectionOptions::default())
}

#[tokio::test]
async fn test_concurrent_lookups_share_one_scan() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        inverter_int_words(),
    ]));
    transport.set_delay(Duration::from_millis(5));
    let connection = connection(&transport);

    let (first, second) = futures::join!(
        connection.model_addresses(),
        connection.model_addresses()
    );
    let (first, second) = (first?, second?);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(transport.scans(), 1);

    // resolved tables are reused
    connection.model_addresses().await?;
    assert_eq!(transport.scans(), 1);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_getters_share_one_scan() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        inverter_int_words(),
        settings_words(),
    ]));
    transport.set_delay(Duration::from_millis(5));
    let connection = connection(&transport);

    let (inverter, settings) = futures::join!(
        connection.get_inverter_model(),
        connection.get_settings_model()
    );
    assert_eq!(inverter?.id(), 103);
    assert_eq!(settings?.id, 121);
    assert_eq!(transport.scans(), 1);

    Ok(())
}

#[tokio::test]
async fn test_common_model_is_read_once() -> Result<()> {
    common_setup();

    let models = vec![common_words(), inverter_int_words()];
    let transport = Arc::new(MockTransport::with_models(&models));
    let connection = connection(&transport);

    let common = connection.get_common_model().await?;
    assert_eq!(common.id, 1);
    assert_eq!(common.length, 66);
    assert_eq!(common.mn, "Fronius");
    assert_eq!(common.md, "Symo 10.0-3-M");
    assert_eq!(common.opt, "");
    assert_eq!(common.vr, "0.3.30.2");
    assert_eq!(common.sn, "34119102");
    assert_eq!(common.da, Some(1));

    assert_eq!(connection.get_common_model().await?, common);

    let start = model_start(&models, 0);
    let common_reads = transport
        .reads()
        .into_iter()
        .filter(|read| *read == (start, 68))
        .count();
    assert_eq!(common_reads, 1);

    Ok(())
}

#[tokio::test]
async fn test_failed_scan_is_retried() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        inverter_int_words(),
    ]));
    let connection = connection(&transport);

    transport.set_fail(true);
    let result = connection.model_addresses().await;
    assert!(matches!(
        result,
        Err(SunSpecError::Transport(TransportError::Io(_)))
    ));

    transport.set_fail(false);
    let table = connection.model_addresses().await?;
    assert_eq!(table.len(), 2);
    assert_eq!(transport.connects(), 2);

    Ok(())
}

#[tokio::test]
async fn test_signature_mismatch_is_not_cached() -> Result<()> {
    common_setup();

    let models = vec![common_words(), inverter_int_words()];
    let transport = Arc::new(MockTransport::with_models(&models));
    transport.load(40000, &[0x1234, 0x5678]);
    let connection = connection(&transport);

    assert_eq!(
        connection.get_inverter_model().await.map(|inverter| inverter.id()),
        Err(SunSpecError::SignatureMismatch(0x12345678))
    );

    // device finished booting
    transport.load(40000, &sunspec_map(&models));

    assert_eq!(connection.get_inverter_model().await?.id(), 103);
    assert_eq!(transport.scans(), 2);

    Ok(())
}

#[tokio::test]
async fn test_moved_model_triggers_rescan() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        inverter_int_words(),
    ]));
    let connection = connection(&transport);

    assert_eq!(connection.get_inverter_model().await?.id(), 103);
    assert_eq!(transport.scans(), 1);

    // firmware update: settings now sit where the inverter model was
    let models = vec![common_words(), settings_words(), inverter_int_words()];
    transport.load(40000, &sunspec_map(&models));

    let result = connection.get_inverter_model().await;
    assert!(matches!(
        result,
        Err(SunSpecError::DecodeMismatch { found: 121, .. })
    ));

    let inverter = connection.get_inverter_model().await?;
    assert_eq!(inverter.id(), 103);
    assert_eq!(transport.scans(), 2);

    let table = connection.model_addresses().await?;
    assert_eq!(table.get(103).map(|a| a.start), Some(model_start(&models, 2)));

    Ok(())
}

#[tokio::test]
async fn test_invalidate_model_addresses() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[common_words()]));
    let connection = connection(&transport);

    connection.model_addresses().await?;
    connection.invalidate_model_addresses();
    connection.model_addresses().await?;

    assert_eq!(transport.scans(), 2);

    Ok(())
}

#[tokio::test]
async fn test_inverter_lookup_prefers_integer_models() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        inverter_float_words(113),
        inverter_int_words(),
    ]));
    let connection = connection(&transport);

    let inverter = connection.get_inverter_model().await?;
    assert!(matches!(inverter, InverterModel::Int(_)));
    assert_eq!(inverter.id(), 103);
    assert_eq!(inverter.length(), 50);

    Ok(())
}

#[tokio::test]
async fn test_float_inverter() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        inverter_float_words(111),
    ]));
    let connection = connection(&transport);

    match connection.get_inverter_model().await? {
        InverterModel::Float(inverter) => {
            assert_eq!(inverter.id, 111);
            assert_eq!(inverter.w, 6990.0);
            assert_eq!(inverter.dca, None);
        }
        other => panic!("expected a float inverter, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_meter_dispatch() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        meter_int_words(203),
    ]));
    let meter = connection(&transport).get_meter_model().await?;
    assert!(matches!(meter, MeterModel::Int(_)));
    assert_eq!(meter.id(), 203);

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        meter_float_words(213),
    ]));
    let meter = connection(&transport).get_meter_model().await?;
    assert!(matches!(meter, MeterModel::Float(_)));
    assert_eq!(meter.id(), 213);
    assert_eq!(meter.length(), 124);

    // integer models win when both are present
    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        meter_float_words(211),
        meter_int_words(201),
    ]));
    let meter = connection(&transport).get_meter_model().await?;
    assert_eq!(meter.id(), 201);

    Ok(())
}

#[tokio::test]
async fn test_large_models_are_read_in_chunks() -> Result<()> {
    common_setup();

    let models = vec![common_words(), meter_float_words(213)];
    let transport = Arc::new(MockTransport::with_models(&models));

    connection(&transport).get_meter_model().await?;

    let start = model_start(&models, 1);
    let reads = transport.reads();
    assert!(reads.contains(&(start, 125)));
    assert!(reads.contains(&(start + 125, 1)));

    Ok(())
}

#[tokio::test]
async fn test_missing_models() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[common_words()]));
    let connection = connection(&transport);

    assert_eq!(
        connection.get_meter_model().await,
        Err(SunSpecError::AddressNotFound("meter"))
    );
    assert!(matches!(
        connection.get_inverter_model().await,
        Err(SunSpecError::AddressNotFound(_))
    ));
    assert!(matches!(
        connection.get_nameplate_model().await,
        Err(SunSpecError::AddressNotFound(_))
    ));

    // a missing model is not a stale table
    assert_eq!(transport.scans(), 1);

    Ok(())
}

#[tokio::test]
async fn test_write_settings_model() -> Result<()> {
    common_setup();

    let models = vec![common_words(), inverter_int_words(), settings_words()];
    let transport = Arc::new(MockTransport::with_models(&models));
    let connection = connection(&transport);

    let mut settings = connection.get_settings_model().await?;
    assert_eq!(settings.w_max, 10000);
    assert_eq!(settings.v_max, Some(253));

    settings.w_max = 8000;
    settings.v_max = None;
    connection.write_settings_model(&settings).await?;

    let start = model_start(&models, 2);
    let writes = transport.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, start + 2);
    assert_eq!(writes[0].1.len(), 20);
    assert_eq!(transport.register(start + 2), Some(8000));
    assert_eq!(transport.register(start + 5), Some(0xFFFF));

    // scale factors are read only
    assert_eq!(transport.register(start + 29), Some((-2i16) as u16));

    let settings = connection.get_settings_model().await?;
    assert_eq!(settings.w_max, 8000);
    assert_eq!(settings.v_max, None);

    Ok(())
}

#[tokio::test]
async fn test_write_controls_model() -> Result<()> {
    common_setup();

    let models = vec![common_words(), inverter_int_words(), controls_words()];
    let transport = Arc::new(MockTransport::with_models(&models));
    let connection = connection(&transport);

    let mut controls = connection.get_controls_model().await?;
    assert_eq!(controls.conn, ConnectControl::Connect);
    assert_eq!(controls.w_max_lim_ena, Enable::Disabled);
    assert_eq!(controls.out_pf_set_sf, -2);

    controls.w_max_lim_pct = 50;
    controls.w_max_lim_ena = Enable::Enabled;
    connection.write_controls_model(&controls).await?;

    let start = model_start(&models, 2);
    let writes = transport.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, start + 2);
    assert_eq!(writes[0].1.len(), 21);
    assert_eq!(transport.register(start + 5), Some(50));
    assert_eq!(transport.register(start + 9), Some(1));

    Ok(())
}

#[tokio::test]
async fn test_mppt_model() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[
        common_words(),
        inverter_int_words(),
        mppt_words(),
    ]));

    let mppt = connection(&transport).get_mppt_model().await?;
    assert_eq!(mppt.n, 2);
    assert_eq!(mppt.tms_per, None);
    assert_eq!(mppt.modules.len(), 2);
    assert_eq!(mppt.modules[0].id, 1);
    assert_eq!(mppt.modules[0].id_str, "PV1");
    assert_eq!(mppt.modules[0].dcw, Some(3200));
    assert_eq!(mppt.modules[1].id_str, "PV2");
    assert_eq!(mppt.modules[1].dcwh, 1_000_000);
    assert_eq!(mppt.modules[1].tmp, None);
    assert_eq!(mppt.modules[1].dc_st, Some(ModuleState::Mppt));

    Ok(())
}

#[tokio::test]
async fn test_destroy() -> Result<()> {
    common_setup();

    let transport = Arc::new(MockTransport::with_models(&[common_words()]));
    let connection = connection(&transport);

    connection.destroy().await;
    assert!(transport.is_destroyed());

    assert!(matches!(
        connection.get_common_model().await,
        Err(SunSpecError::Transport(TransportError::Destroyed))
    ));

    Ok(())
}
