//! The bitstream module forms the I/O subsystem of the compressor.
//!
//! Huffman codes have no fixed width, so the compressed file is a stream of bits rather than
//! bytes. BitWriter packs codewords into bytes (most significant bit first, zero padded at the
//! end) and BitReader hands them back one bit at a time for the tree walk in the decoder.
//!
pub mod bitreader;
pub mod bitwriter;
