const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

#[derive(Debug, Default, Clone, Copy)]
pub struct Crc {
    sum: u16,
}

impl Crc {
    pub fn new() -> Self {
        Self { sum: 0 }
    }

    pub fn add_byte(&mut self, byte: u8) {
        // lower nibble
        let tmp = CRC_TABLE[(self.sum & 0x0F) as usize];
        self.sum = (self.sum >> 4) & 0x0FFF;
        self.sum = self.sum ^ tmp ^ CRC_TABLE[(byte & 0x0F) as usize];

        // upper nibble
        let tmp = CRC_TABLE[(self.sum & 0x0F) as usize];
        self.sum = (self.sum >> 4) & 0x0FFF;
        self.sum = self.sum ^ tmp ^ CRC_TABLE[(byte >> 4) as usize];
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.add_byte(*byte);
        }
    }

    pub fn value(&self) -> u16 {
        self.sum
    }
}

pub fn calculate_crc(bytes: &[u8]) -> u16 {
    let mut crc = Crc::new();
    crc.add_bytes(bytes);
    crc.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(calculate_crc(&[]), 0);
    }

    #[test]
    fn matches_known_twelve_byte_header() {
        // Empty FIT file with a 12-byte header; trailer is 0xC136.
        let header = [
            0x0c, 0x20, 0xeb, 0x07, 0x00, 0x00, 0x00, 0x00, 0x2e, 0x46, 0x49, 0x54,
        ];
        assert_eq!(calculate_crc(&header), 0xC136);
    }

    #[test]
    fn appending_the_crc_yields_zero() {
        let mut bytes = b"\x0e\x10\x5d\x08\x00\x00\x00\x00.FIT\x00\x00".to_vec();
        let crc = calculate_crc(&bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());
        assert_eq!(calculate_crc(&bytes), 0);
    }

    #[test]
    fn incremental_and_one_shot_agree() {
        let data: Vec<u8> = (0..=255u8).collect();
        let mut crc = Crc::new();
        for chunk in data.chunks(7) {
            crc.add_bytes(chunk);
        }
        assert_eq!(crc.value(), calculate_crc(&data));
    }
}
