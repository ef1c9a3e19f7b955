mod clump_text;
mod packing;
mod sphere_contact;
mod surface_extraction;
mod voxelization;
