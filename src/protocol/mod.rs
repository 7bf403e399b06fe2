pub mod atv320;
pub mod modbus;
pub mod tty;
