pub mod packet_id_generator;

pub use packet_id_generator::PacketIdGenerator;
