//! # RFM69 Driver Tests
//!
//! Exercises the mode state machine, listen mode sequencing, power
//! application, and the message framer against the scripted mock HAL.

use doorbell_rs::radio::driver::{
    Dio0Mapping, ListenResolution, ListenTiming, RadioMode, Rfm69, Rfm69Error,
};
use doorbell_rs::radio::hal::MockHal;
use doorbell_rs::radio::registers::*;
use std::time::Duration;

fn driver(high_power: bool) -> (Rfm69<MockHal>, MockHal) {
    let hal = MockHal::new();
    (Rfm69::new(hal.clone(), high_power), hal)
}

mod mode_machine {
    use super::*;

    #[test]
    fn set_mode_round_trips_all_modes() {
        let (mut radio, hal) = driver(true);
        for mode in [
            RadioMode::Sleep,
            RadioMode::Standby,
            RadioMode::FrequencySynth,
            RadioMode::Transmit,
            RadioMode::Receive,
        ] {
            radio.set_mode(mode).unwrap();
            assert_eq!(radio.read_mode().unwrap(), mode);
            assert_eq!(hal.mode(), mode as u8);
        }
    }

    #[test]
    fn out_of_range_mode_is_rejected_without_bus_traffic() {
        let (_, hal) = driver(true);
        for raw in [5u8, 6, 7, 0xFF] {
            assert!(matches!(
                RadioMode::from_raw(raw),
                Err(Rfm69Error::InvalidMode(_))
            ));
        }
        assert_eq!(hal.write_count(), 0);
    }

    #[test]
    fn set_mode_is_idempotent() {
        let (mut radio, hal) = driver(true);
        // Power-on state is standby; requesting it again must not write
        radio.set_mode(RadioMode::Standby).unwrap();
        assert_eq!(hal.write_count(), 0);

        radio.set_mode(RadioMode::Receive).unwrap();
        let writes_after_switch = hal.write_count();
        radio.set_mode(RadioMode::Receive).unwrap();
        assert_eq!(hal.write_count(), writes_after_switch);
    }

    #[test]
    fn wait_for_mode_ready_times_out_on_stuck_transition() {
        let (mut radio, hal) = driver(true);
        hal.radio().mode_ready_on_switch = false;
        radio.set_mode(RadioMode::Receive).unwrap();
        let result = radio.wait_for_mode_ready(Duration::from_millis(5));
        assert!(matches!(result, Err(Rfm69Error::Timeout("mode ready"))));
    }
}

mod config_applier {
    use super::*;

    #[test]
    fn init_applies_base_config_in_order() {
        let (mut radio, hal) = driver(true);
        radio.init().unwrap();

        let writes = hal.radio().writes.clone();
        assert_eq!(&writes[..BASE_CONFIG.len()], &BASE_CONFIG[..]);
        // High power module: OCP off
        assert_eq!(hal.writes_to(REG_OCP), vec![RF_OCP_TRIM]);

        let (mut radio, hal) = driver(false);
        radio.init().unwrap();
        assert_eq!(hal.writes_to(REG_OCP), vec![RF_OCP_TRIM | RF_OCP_ON]);
    }

    #[test]
    fn partial_failure_leaves_earlier_entries_applied() {
        let (mut radio, hal) = driver(true);
        hal.radio().fail_register_write_at = Some(1);

        let config = [(REG_LNA, 0x88), (REG_RXBW, 0x4C), (REG_SYNCCONFIG, 0x88)];
        let result = radio.apply_config(&config);

        assert!(matches!(result, Err(Rfm69Error::Transport(_))));
        // Entry 0 took effect, nothing after the failing entry did
        assert_eq!(hal.radio().writes, vec![(REG_LNA, 0x88)]);
        // Chip select must be released on the error path too
        assert!(!hal.is_selected());
    }
}

mod power {
    use super::*;

    #[test]
    fn boost_segment_writes_level_and_test_registers() {
        let (mut radio, hal) = driver(true);
        radio.set_power_dbm(20).unwrap();
        assert_eq!(hal.writes_to(REG_PALEVEL), vec![RF_PALEVEL_PA1_PA2_ON | 31]);
        assert_eq!(hal.writes_to(REG_TESTPA1), vec![RF_TESTPA1_BOOST]);
        assert_eq!(hal.writes_to(REG_TESTPA2), vec![RF_TESTPA2_BOOST]);
    }

    #[test]
    fn low_segment_forces_boost_registers_off() {
        let (mut radio, hal) = driver(true);
        radio.set_power_dbm(13).unwrap();
        assert_eq!(hal.writes_to(REG_PALEVEL), vec![RF_PALEVEL_PA1_ON | 31]);
        assert_eq!(hal.writes_to(REG_TESTPA1), vec![RF_TESTPA1_NORMAL]);
        assert_eq!(hal.writes_to(REG_TESTPA2), vec![RF_TESTPA2_NORMAL]);
    }

    #[test]
    fn standard_module_never_touches_test_registers() {
        let (mut radio, hal) = driver(false);
        radio.set_power_dbm(13).unwrap();
        assert_eq!(hal.writes_to(REG_PALEVEL), vec![RF_PALEVEL_PA0_ON | 31]);
        assert!(hal.writes_to(REG_TESTPA1).is_empty());
        assert!(hal.writes_to(REG_TESTPA2).is_empty());
    }

    #[test]
    fn rejected_request_issues_no_writes() {
        let (mut radio, hal) = driver(false);
        assert!(matches!(
            radio.set_power_dbm(14),
            Err(Rfm69Error::PowerAboveStandardCeiling { dbm: 14 })
        ));
        assert_eq!(hal.write_count(), 0);

        let (mut radio, hal) = driver(true);
        assert!(matches!(
            radio.set_power_dbm(-3),
            Err(Rfm69Error::PowerBelowHighPowerFloor { dbm: -3 })
        ));
        assert_eq!(hal.write_count(), 0);
    }
}

mod framer {
    use super::*;

    #[test]
    fn empty_send_clears_fifo_but_never_transmits() {
        let (mut radio, hal) = driver(true);
        radio.send(&[]).unwrap();

        let state = hal.radio();
        assert_eq!(state.fifo_flushes, 1);
        assert!(state.tx_fifo.is_empty());
        assert!(state.transmitted.is_empty());
        // No RegOpMode write ever selected transmit
        assert!(state
            .mode_history
            .iter()
            .all(|v| (v >> RF_OPMODE_SHIFT) & RF_OPMODE_MASK != RadioMode::Transmit as u8));
    }

    #[test]
    fn send_fills_fifo_transmits_and_sleeps() {
        let (mut radio, hal) = driver(true);
        radio.send(&[0x42]).unwrap();

        assert_eq!(hal.radio().transmitted, vec![vec![0x42]]);
        assert_eq!(hal.mode(), RadioMode::Sleep as u8);
    }

    #[test]
    fn receive_never_overfills_the_buffer() {
        let (mut radio, hal) = driver(true);
        hal.queue_rx_payload(&[0x42, 0x43, 0x44]);

        let mut buffer = [0u8; 1];
        let bytes = radio.receive(&mut buffer).unwrap();
        assert_eq!(bytes, 1);
        assert_eq!(buffer[0], 0x42);
        // The surplus stays in the FIFO
        assert_eq!(hal.radio().rx_fifo.len(), 2);
    }

    #[test]
    fn receive_without_payload_returns_zero_and_stays_in_rx() {
        let (mut radio, hal) = driver(true);
        let mut buffer = [0u8; 1];
        assert_eq!(radio.receive(&mut buffer).unwrap(), 0);
        assert_eq!(hal.mode(), RadioMode::Receive as u8);
    }

    #[test]
    fn receive_returns_to_rx_after_drain_outside_listen_mode() {
        let (mut radio, hal) = driver(true);
        hal.queue_rx_payload(&[0x42]);

        let mut buffer = [0u8; 1];
        assert_eq!(radio.receive(&mut buffer).unwrap(), 1);
        assert_eq!(hal.mode(), RadioMode::Receive as u8);
    }
}

mod dio_mapping {
    use super::*;

    #[test]
    fn mapping_lands_in_the_dio0_field() {
        let (mut radio, hal) = driver(true);
        radio.set_dio0_mapping(Dio0Mapping::RxPayloadReady).unwrap();
        radio.set_dio0_mapping(Dio0Mapping::TxNone).unwrap();
        assert_eq!(hal.writes_to(REG_DIOMAPPING1), vec![0x40, 0x80]);
    }
}

mod listen_mode {
    use super::*;

    fn timings() -> (ListenTiming, ListenTiming) {
        (
            ListenTiming::new(ListenResolution::Ms262, 1),
            ListenTiming::new(ListenResolution::Us64, 16),
        )
    }

    #[test]
    fn enable_writes_control_and_timing_registers() {
        let (mut radio, hal) = driver(true);
        let (idle, rx) = timings();
        radio.enable_listen_mode(idle, rx).unwrap();

        assert!(radio.listen_mode_active());
        // ListenEnd=10 resume, ResolRx=01, ResolIdle=11
        assert_eq!(hal.writes_to(REG_LISTEN1), vec![0xD4]);
        assert_eq!(hal.writes_to(REG_LISTEN2), vec![1]);
        assert_eq!(hal.writes_to(REG_LISTEN3), vec![16]);
        assert_eq!(hal.writes_to(REG_RSSITHRESH), vec![RF_LISTEN_RSSI_THRESHOLD]);
        assert_eq!(hal.writes_to(REG_RXTIMEOUT1), vec![RF_LISTEN_RX_TIMEOUT]);
        assert_eq!(hal.writes_to(REG_RXTIMEOUT2), vec![RF_LISTEN_RX_TIMEOUT]);
        // ListenOn went in together with standby
        assert_eq!(hal.writes_to(REG_OPMODE), vec![RF_OPMODE_LISTEN_ON | 0x04]);
    }

    #[test]
    fn enable_failure_leaves_flag_clear() {
        let (mut radio, hal) = driver(true);
        hal.radio().fail_register_write_at = Some(0);
        let (idle, rx) = timings();
        assert!(radio.enable_listen_mode(idle, rx).is_err());
        assert!(!radio.listen_mode_active());
    }

    #[test]
    fn disable_runs_the_two_step_abort_sequence() {
        let (mut radio, hal) = driver(true);
        let (idle, rx) = timings();
        radio.enable_listen_mode(idle, rx).unwrap();
        radio.disable_listen_mode(RadioMode::Sleep).unwrap();

        assert!(!radio.listen_mode_active());
        let opmode_writes = hal.writes_to(REG_OPMODE);
        // Enable, then abort-with-target, then target alone
        assert_eq!(
            opmode_writes,
            vec![RF_OPMODE_LISTEN_ON | 0x04, RF_OPMODE_LISTEN_ABORT, 0x00]
        );
    }

    #[test]
    fn receive_in_listen_mode_bypasses_payload_check_and_rx_reentry() {
        let (mut radio, hal) = driver(true);
        let (idle, rx) = timings();
        radio.enable_listen_mode(idle, rx).unwrap();
        hal.queue_rx_payload(&[0x42]);
        // The drain must not depend on PayloadReady while listening
        hal.radio().payload_ready = false;

        let opmode_writes_before = hal.writes_to(REG_OPMODE).len();
        let mut buffer = [0u8; 1];
        assert_eq!(radio.receive(&mut buffer).unwrap(), 1);
        assert_eq!(buffer[0], 0x42);

        // No RX re-entry: the only mode traffic allowed is the standby
        // transition before draining, and here even that is a no-op
        // because listen mode already sits in standby.
        assert_eq!(hal.writes_to(REG_OPMODE).len(), opmode_writes_before);
    }
}
