use ferrous_discovery_domain::RecordType;
use hickory_proto::rr::RecordType as HickoryRecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        match record_type {
            RecordType::SRV => HickoryRecordType::SRV,
            RecordType::A => HickoryRecordType::A,
        }
    }

    pub fn from_hickory(record_type: HickoryRecordType) -> Option<RecordType> {
        match record_type {
            HickoryRecordType::SRV => Some(RecordType::SRV),
            HickoryRecordType::A => Some(RecordType::A),
            _ => None,
        }
    }
}
