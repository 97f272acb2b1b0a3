use std::cell::Cell;
use std::rc::Rc;

use bmp180_driver::{Bmp180, Bmp180Bus, Error, Measurement, Oversampling, Reading};

/// Datasheet calibration, AC1 first.
const COEFF: [u16; 11] = [
    408, 0xFFB8, 0xC7D1, 32741, 32757, 23153, 6190, 4, 0x8000, 0xDDF9, 2868,
];
const UT: u16 = 27898;
const UP: u32 = 23843;

/// Sensor model on a millisecond clock shared with the test.
struct SimulatedSensor {
    now: Rc<Cell<u32>>,
    control: u8,
    done_at: u32,
    reads: usize,
}

impl SimulatedSensor {
    fn new(now: Rc<Cell<u32>>) -> Self {
        SimulatedSensor {
            now,
            control: 0,
            done_at: 0,
            reads: 0,
        }
    }

    fn conversion_ms(control: u8) -> u32 {
        match control & 0x1F {
            0x0E => 5,
            _ => [5, 8, 14, 26][usize::from(control >> 6)],
        }
    }
}

impl Bmp180Bus for SimulatedSensor {
    type Error = ();

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), ()> {
        self.reads += 1;
        match reg {
            0xAA..=0xBE => {
                let c = COEFF[usize::from(reg - 0xAA) / 2];
                buf.copy_from_slice(&c.to_be_bytes());
            }
            0xD0 => buf[0] = 0x55,
            0xF4 => {
                if self.now.get() >= self.done_at {
                    self.control &= !0x20;
                }
                buf[0] = self.control;
            }
            0xF6 if buf.len() == 2 => buf.copy_from_slice(&UT.to_be_bytes()),
            0xF6 => {
                let oss = u32::from(self.control >> 6);
                let raw = (UP << oss) << (8 - oss);
                buf.copy_from_slice(&raw.to_be_bytes()[1..]);
            }
            _ => return Err(()),
        }
        Ok(())
    }

    fn write_reg(&mut self, reg: u8, data: u8) -> Result<(), ()> {
        match reg {
            0xF4 => {
                self.control = data;
                self.done_at = self.now.get() + Self::conversion_ms(data);
            }
            0xE0 if data == 0xB6 => self.control = 0,
            _ => return Err(()),
        }
        Ok(())
    }
}

fn sensor(oss: Oversampling) -> (Bmp180<SimulatedSensor>, Rc<Cell<u32>>) {
    let now = Rc::new(Cell::new(0));
    let bmp = Bmp180::new(SimulatedSensor::new(now.clone()), oss).unwrap();
    (bmp, now)
}

fn advance(now: &Cell<u32>, d: std::time::Duration) {
    now.set(now.get() + d.as_millis() as u32);
}

#[test]
fn chip_id() {
    let (mut bmp, _) = sensor(Oversampling::default());
    assert_eq!(bmp.chip_id().unwrap(), bmp180_driver::CHIP_ID);
    bmp.soft_reset().unwrap();
}

#[test]
fn data_status_follows_conversion_time() {
    let (mut bmp, now) = sensor(Oversampling::HighResolution);

    bmp.start_measurement(Measurement::Pressure).unwrap();
    assert_eq!(bmp.conversion_time().as_millis(), 14);
    assert!(!bmp.is_data_ready().unwrap());

    now.set(now.get() + 13);
    assert!(bmp.data_status().unwrap().converting());

    now.set(now.get() + 1);
    assert!(bmp.is_data_ready().unwrap());
}

#[test]
fn temperature_then_pressure() {
    for &oss in &[
        Oversampling::UltraLowPower,
        Oversampling::Standard,
        Oversampling::HighResolution,
        Oversampling::UltraHighResolution,
    ] {
        let (mut bmp, now) = sensor(oss);

        bmp.start_measurement(Measurement::Temperature).unwrap();
        advance(&now, bmp.conversion_time());
        let t = bmp.temperature().unwrap();
        assert!((t - 15.0).abs() < 0.1, "t = {}", t);

        bmp.start_measurement(Measurement::Pressure).unwrap();
        advance(&now, bmp.conversion_time());
        let p = bmp.pressure().unwrap();
        assert!((p - 69964.0).abs() < 5.0, "{:?}: p = {}", oss, p);
    }
}

#[test]
fn pressure_requires_temperature() {
    let (mut bmp, now) = sensor(Oversampling::UltraLowPower);
    bmp.start_measurement(Measurement::Pressure).unwrap();
    advance(&now, bmp.conversion_time());
    assert_eq!(bmp.pressure(), Err(Error::Sequence));
}

#[test]
fn iterator_yields_each_conversion_once() {
    let (mut bmp, now) = sensor(Oversampling::Standard);
    let mut readings = bmp.readings();

    // Nothing started, nothing to read
    assert_eq!(readings.next(), Some(Ok(None)));

    readings.start_measurement(Measurement::Temperature).unwrap();
    assert_eq!(readings.next(), Some(Ok(None)));
    assert_eq!(readings.next(), Some(Ok(None)));
    now.set(now.get() + 5);
    match readings.next() {
        Some(Ok(Some(Reading::Temperature(t)))) => assert!((t - 15.0).abs() < 0.1),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(readings.next(), Some(Ok(None)));

    readings.start_measurement(Measurement::Pressure).unwrap();
    now.set(now.get() + 8);
    match readings.next() {
        Some(Ok(Some(Reading::Pressure(p)))) => assert!((p - 69964.0).abs() < 5.0),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(readings.next(), Some(Ok(None)));
}

#[test]
fn idle_polling_has_no_bus_traffic() {
    let (mut bmp, _) = sensor(Oversampling::default());
    for _ in 0..3 {
        assert_eq!(bmp.poll(), Ok(None));
    }
    // 11 calibration reads only
    assert_eq!(bmp.free().reads, 11);
}

#[test]
fn restart_resets_conversion_time() {
    let (mut bmp, now) = sensor(Oversampling::UltraHighResolution);
    bmp.start_measurement(Measurement::Pressure).unwrap();
    now.set(now.get() + 20);
    bmp.start_measurement(Measurement::Pressure).unwrap();
    now.set(now.get() + 20);
    assert!(!bmp.is_data_ready().unwrap());
    now.set(now.get() + 6);
    assert!(bmp.is_data_ready().unwrap());
}
